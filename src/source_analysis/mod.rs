// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Source analysis for Vela: lexing and parsing.
//!
//! This module contains the source buffer, lexer, token definitions, and
//! the recursive descent parser.
//!
//! # Lexical Analysis
//!
//! [`tokenize`] converts a [`SourceBuffer`] into [`Token`]s. Each token
//! carries its (line, column) [`Span`] and raw text. Structural tokens
//! (`Newline`, `Indent`, `Outdent`, `EndOfFile`) are synthesized from
//! line boundaries and indentation deltas.
//!
//! # Parsing
//!
//! [`parse`] converts tokens into an [`Ast`](crate::ast::Ast). Binary
//! operator precedence uses Pratt parsing; block-bodied definitions defer
//! their body parsing until all sibling names in the enclosing scope are
//! known.
//!
//! # Error Handling
//!
//! Neither stage fails on malformed input: problems become
//! [`TokenKind::Invalid`] tokens or
//! [`NodeKind::Error`](crate::ast::NodeKind::Error) placeholder nodes,
//! with diagnostics accumulated in the shared
//! [`Diagnostics`](crate::Diagnostics) sink. The only hard errors are
//! setup failures ([`SourceError`]) raised before lexing begins.

mod buffer;
mod error;
mod lexer;
mod parser;
mod span;
mod token;


pub use buffer::SourceBuffer;
pub use error::SourceError;
pub use lexer::tokenize;
pub use parser::parse;
pub(crate) use parser::binary_binding_power;
pub use span::{Position, Span};
pub use token::{Token, TokenKind};
