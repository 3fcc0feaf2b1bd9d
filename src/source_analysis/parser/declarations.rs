// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Definition parsing: modifiers, `enum`, and `class`.
//!
//! Definitions are parsed in two phases. The header (modifiers, name,
//! base list) is parsed in source order and the name is registered with
//! the enclosing scope immediately; the body is *skipped* and recorded as
//! a pending task. Once the enclosing block's statement list is complete,
//! [`Parser::drain_scope`](super::Parser::drain_scope) replays each
//! recorded body region through the matching body grammar. Members of a
//! scope can therefore reference siblings declared after them.
//!
//! Bodies come in three surface forms:
//!
//! - braced: `enum Color { Red, Green }`
//! - indented: a newline, an indented block, and a closing outdent
//! - empty: the single keyword `pass`

use ecow::EcoString;

use crate::ast::{NodeId, NodeKind};
use crate::source_analysis::parser::{BodyKind, Parser};
use crate::source_analysis::TokenKind;

impl Parser<'_> {
    /// Parses a run of leading modifier keywords into [`NodeKind::Modifier`]
    /// nodes.
    pub(super) fn parse_modifiers(&mut self) -> Vec<NodeId> {
        let mut modifiers = Vec::new();
        while self.current_kind().is_modifier() {
            let span = self.current_span();
            let keyword = self.advance().kind();
            modifiers.push(self.ast.alloc(NodeKind::Modifier { keyword }, span));
        }
        modifiers
    }

    /// Parses the definition following a (possibly empty) modifier list.
    pub(super) fn parse_definition(&mut self, modifiers: Vec<NodeId>) -> NodeId {
        match self.current_kind() {
            TokenKind::KeywordEnum => self.parse_enum(modifiers),
            TokenKind::KeywordClass => self.parse_class(modifiers),
            _ => {
                let message = format!(
                    "expected a definition after modifiers, found `{}`",
                    self.current_token()
                );
                self.error_node(message)
            }
        }
    }

    /// Parses an enum definition header and defers its body.
    ///
    /// Grammar: `enum name ['(' bases ')'] body` where `body` is braced,
    /// indented, or `pass`.
    fn parse_enum(&mut self, modifiers: Vec<NodeId>) -> NodeId {
        let start = self.current_span();
        self.advance();

        let Some(name_token) = self.expect(TokenKind::Identifier, "expected enum name") else {
            return self.ast.alloc(
                NodeKind::Error {
                    message: "expected enum name".into(),
                },
                start,
            );
        };
        let name_text: EcoString = name_token.text().into();
        let name = self
            .ast
            .alloc(NodeKind::Name { text: name_text.clone() }, name_token.span());

        let bases = self.parse_type_list();

        let node = self.ast.alloc(
            NodeKind::EnumDef {
                modifiers: modifiers.clone(),
                name,
                bases: bases.clone(),
                items: Vec::new(),
            },
            start,
        );
        for modifier in modifiers {
            self.ast.adopt(node, modifier);
        }
        self.ast.adopt(node, name);
        for base in bases {
            self.ast.adopt(node, base);
        }

        let cursor = self.current;
        self.skip_body();
        self.register_named_node(name_text, node, cursor, BodyKind::Enum, name_token.span());
        self.ast.finish_span(node, self.prev_span());
        node
    }

    /// Parses a class definition header and defers its body.
    fn parse_class(&mut self, modifiers: Vec<NodeId>) -> NodeId {
        let start = self.current_span();
        self.advance();

        let Some(name_token) = self.expect(TokenKind::Identifier, "expected class name") else {
            return self.ast.alloc(
                NodeKind::Error {
                    message: "expected class name".into(),
                },
                start,
            );
        };
        let name_text: EcoString = name_token.text().into();
        let name = self
            .ast
            .alloc(NodeKind::Name { text: name_text.clone() }, name_token.span());

        let bases = self.parse_type_list();

        let node = self.ast.alloc(
            NodeKind::ClassDef {
                modifiers: modifiers.clone(),
                name,
                bases: bases.clone(),
                body: None,
            },
            start,
        );
        for modifier in modifiers {
            self.ast.adopt(node, modifier);
        }
        self.ast.adopt(node, name);
        for base in bases {
            self.ast.adopt(node, base);
        }

        let cursor = self.current;
        self.skip_body();
        self.register_named_node(name_text, node, cursor, BodyKind::Class, name_token.span());
        self.ast.finish_span(node, self.prev_span());
        node
    }

    /// Parses an optional parenthesized, comma-separated type name list.
    fn parse_type_list(&mut self) -> Vec<NodeId> {
        let mut types = Vec::new();
        if !self.match_token(TokenKind::OpLeftParen) {
            return types;
        }
        if self.match_token(TokenKind::OpRightParen) {
            return types;
        }
        loop {
            let span = self.current_span();
            match self.expect(TokenKind::Identifier, "expected type name") {
                Some(token) => {
                    types.push(self.ast.alloc(
                        NodeKind::TypeName {
                            text: token.text().into(),
                        },
                        span,
                    ));
                }
                None => break,
            }
            if !self.match_token(TokenKind::OpComma) {
                break;
            }
        }
        self.expect(TokenKind::OpRightParen, "expected `)` to close type list");
        types
    }

    // ========================================================================
    // Body Skipping
    // ========================================================================

    /// Skips a definition body without parsing it, leaving the cursor
    /// just past the body.
    ///
    /// The skipped region is replayed later through the real body
    /// grammar; here only the body's extent matters.
    fn skip_body(&mut self) {
        match self.current_kind() {
            TokenKind::KeywordPass => {
                self.advance();
            }
            TokenKind::OpLeftBrace => {
                self.advance();
                let mut depth = 1usize;
                while depth > 0 && !self.is_at_end() {
                    match self.current_kind() {
                        TokenKind::OpLeftBrace => depth += 1,
                        TokenKind::OpRightBrace => depth -= 1,
                        _ => {}
                    }
                    self.advance();
                }
            }
            TokenKind::Newline if self.peek_kind() == Some(TokenKind::Indent) => {
                self.advance();
                self.advance();
                let mut depth = 1usize;
                while depth > 0 && !self.is_at_end() {
                    match self.current_kind() {
                        TokenKind::Indent => depth += 1,
                        TokenKind::Outdent => depth -= 1,
                        _ => {}
                    }
                    if depth > 0 {
                        self.advance();
                    }
                }
                // The closing outdent belongs to this body; see
                // `expect_statement_end` for the terminator interplay.
                self.match_token(TokenKind::Outdent);
            }
            _ => {
                let span = self.current_span();
                self.diagnostics.error("expected a definition body", span);
                self.statement_error = true;
            }
        }
    }

    // ========================================================================
    // Deferred Body Grammars
    // ========================================================================

    /// Parses an enum body into an already-allocated [`NodeKind::EnumDef`].
    ///
    /// Called from [`Parser::drain_scope`](super::Parser::drain_scope)
    /// with the cursor repositioned at the body start.
    pub(super) fn parse_enum_body(&mut self, node: NodeId) {
        let mut items = Vec::new();
        match self.current_kind() {
            TokenKind::KeywordPass => {
                self.advance();
            }
            TokenKind::OpLeftBrace => {
                self.advance();
                loop {
                    self.skip_statement_separators();
                    if self.check(TokenKind::OpRightBrace) || self.is_at_end() {
                        break;
                    }
                    let before = self.current;
                    items.push(self.parse_enum_item());
                    self.match_token(TokenKind::OpComma);
                    // Malformed items must not stall the loop.
                    if self.current == before {
                        self.advance();
                    }
                }
                self.expect(TokenKind::OpRightBrace, "expected `}` to close enum body");
            }
            TokenKind::Newline if self.peek_kind() == Some(TokenKind::Indent) => {
                self.advance();
                self.advance();
                loop {
                    while self.match_token(TokenKind::Newline) {}
                    if self.check(TokenKind::Outdent) || self.is_at_end() {
                        break;
                    }
                    let before = self.current;
                    items.push(self.parse_enum_item());
                    self.match_token(TokenKind::OpComma);
                    if self.current == before {
                        self.advance();
                    }
                }
            }
            _ => {
                // skip_body already reported the malformed body.
            }
        }
        for &item in &items {
            self.ast.adopt(node, item);
        }
        if let NodeKind::EnumDef { items: slot, .. } = self.ast.kind_mut(node) {
            *slot = items;
        }
    }

    /// Parses one enum item: `name ['(' types ')'] ['=' constant]`.
    fn parse_enum_item(&mut self) -> NodeId {
        let start = self.current_span();
        let Some(name_token) = self.expect(TokenKind::Identifier, "expected enum item name")
        else {
            let placeholder = self.ast.alloc(
                NodeKind::Error {
                    message: "expected enum item name".into(),
                },
                start,
            );
            // Guarantee progress on malformed items.
            if !self.current_kind().is_structural()
                && !self.check(TokenKind::OpRightBrace)
                && !self.check(TokenKind::OpComma)
            {
                self.advance();
            }
            return placeholder;
        };
        let name = self.ast.alloc(
            NodeKind::Name {
                text: name_token.text().into(),
            },
            name_token.span(),
        );

        let types = self.parse_type_list();

        let value = if self.match_token(TokenKind::OpAssign) {
            let value = self.parse_expression();
            if !matches!(self.ast.kind(value), NodeKind::Literal { .. }) {
                let span = self.ast.span(value);
                self.diagnostics.error("constant value expected", span);
            }
            Some(value)
        } else {
            None
        };

        let node = self.ast.alloc(
            NodeKind::EnumItem {
                name,
                types: types.clone(),
                value,
            },
            start,
        );
        self.ast.adopt(node, name);
        for ty in types {
            self.ast.adopt(node, ty);
        }
        if let Some(value) = value {
            self.ast.adopt(node, value);
        }
        node
    }

    /// Parses a class body into an already-allocated
    /// [`NodeKind::ClassDef`].
    ///
    /// A `pass` body leaves the body slot empty. Block bodies open their
    /// own scope, so member definitions defer their bodies in turn.
    pub(super) fn parse_class_body(&mut self, node: NodeId) {
        let body = match self.current_kind() {
            TokenKind::KeywordPass => {
                self.advance();
                None
            }
            TokenKind::OpLeftBrace => {
                self.advance();
                let block = self.parse_block_until(TokenKind::OpRightBrace);
                self.expect(TokenKind::OpRightBrace, "expected `}` to close class body");
                Some(block)
            }
            TokenKind::Newline if self.peek_kind() == Some(TokenKind::Indent) => {
                self.advance();
                self.advance();
                let block = self.parse_block_until(TokenKind::Outdent);
                self.match_token(TokenKind::Outdent);
                Some(block)
            }
            _ => None,
        };
        if let Some(block) = body {
            self.ast.adopt(node, block);
        }
        if let NodeKind::ClassDef { body: slot, .. } = self.ast.kind_mut(node) {
            *slot = body;
        }
    }

    /// Skips separators between block statements.
    ///
    /// Inside braced blocks the lexer still synthesizes indentation
    /// tokens, so they are separators here; an `Outdent` is kept only
    /// when it is the block's own terminator.
    fn skip_block_separators(&mut self, terminator: TokenKind) {
        loop {
            match self.current_kind() {
                TokenKind::Newline | TokenKind::Indent => {
                    self.advance();
                }
                TokenKind::Outdent if terminator != TokenKind::Outdent => {
                    self.advance();
                }
                _ => return,
            }
        }
    }

    /// Parses statements into a [`NodeKind::Block`] until `terminator`
    /// or end of input.
    fn parse_block_until(&mut self, terminator: TokenKind) -> NodeId {
        let start = self.current_span();
        let block = self.ast.alloc(NodeKind::Block { body: Vec::new() }, start);
        self.push_scope();

        let mut body = Vec::new();
        self.skip_block_separators(terminator);
        while !self.check(terminator) && !self.is_at_end() {
            let statement = self.parse_statement();
            self.ast.adopt(block, statement);
            body.push(statement);
            self.skip_block_separators(terminator);
        }

        self.drain_scope();
        if let NodeKind::Block { body: slot } = self.ast.kind_mut(block) {
            *slot = body;
        }
        self.ast.finish_span(block, self.prev_span());
        block
    }
}
