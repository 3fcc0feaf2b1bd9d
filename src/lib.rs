// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Vela compiler core.
//!
//! This crate contains the front end of the Vela compiler:
//! - Lexical analysis (tokenization, indentation tracking)
//! - Parsing (AST construction with error recovery)
//! - Code emission (Vela source text or C# source text)
//!
//! [`SourceUnit`] drives the pipeline and exposes each stage's output:
//! the token stream, the AST, and the emitted text. Every stage
//! accumulates diagnostics instead of aborting on the first problem.
//!
//! # Example
//!
//! ```
//! use vela_core::{SourceUnit, Target};
//!
//! let mut unit = SourceUnit::from_source("await x");
//! let text = unit.emit(Target::Vela);
//! assert_eq!(text, "await x");
//! assert!(!unit.diagnostics().has_errors());
//! ```

pub mod ast;
pub mod diagnostics;
pub mod emit;
pub mod source_analysis;
mod unit;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use emit::Target;
pub use unit::SourceUnit;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Ast, NodeId, NodeKind};
    pub use crate::diagnostics::{Diagnostic, Diagnostics, Severity};
    pub use crate::source_analysis::{Position, Span, Token, TokenKind};
}
