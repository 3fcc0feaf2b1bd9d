// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing using Pratt parsing for operator precedence.
//!
//! The grammar is layered:
//!
//! - **atoms**: identifiers, `self`, literals, keyword constants, and
//!   parenthesized groups (grouping affects structure only; no node is
//!   allocated for the parentheses themselves);
//! - **prefix**: `not`, `-`, `+`, `~`, `!`, `++`, `--`, and `await`;
//! - **infix**: the binary operator table in
//!   [`binary_binding_power`](super::binary_binding_power).
//!
//! `await` takes a whole expression as its operand, so `await a + b`
//! awaits the sum.

use crate::ast::{LiteralKind, NodeId, NodeKind};
use crate::source_analysis::parser::{binary_binding_power, Parser};
use crate::source_analysis::TokenKind;

/// Red zone and new stack size for growing the stack when parsing deeply
/// nested expressions.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

impl Parser<'_> {
    /// Parses a complete expression.
    pub(super) fn parse_expression(&mut self) -> NodeId {
        self.parse_expression_bp(0)
    }

    /// Parses an expression with a minimum binding power (Pratt parsing).
    ///
    /// Only binary operators whose left binding power is at least
    /// `min_bp` are consumed; looser operators are left for an enclosing
    /// call.
    pub(super) fn parse_expression_bp(&mut self, min_bp: u8) -> NodeId {
        if let Err(placeholder) = self.enter_nesting() {
            return placeholder;
        }
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            let mut lhs = self.parse_prefix();

            while let Some(bp) = binary_binding_power(self.current_kind()) {
                if bp.left < min_bp {
                    break;
                }
                let op = self.advance().kind();
                let rhs = self.parse_expression_bp(bp.right);
                let span = self.ast.span(lhs);
                let node = self.ast.alloc(NodeKind::Binary { op, lhs, rhs }, span);
                self.ast.adopt(node, lhs);
                self.ast.adopt(node, rhs);
                lhs = node;
            }

            lhs
        });
        self.leave_nesting();
        result
    }

    /// Parses a prefix operator chain, `await`, or an atom.
    fn parse_prefix(&mut self) -> NodeId {
        match self.current_kind() {
            TokenKind::KeywordAwait => self.parse_await(),
            // `not` binds looser than comparisons: `not a == b` negates
            // the comparison.
            TokenKind::KeywordNot => self.parse_unary(18),
            TokenKind::OpSubtract
            | TokenKind::OpAdd
            | TokenKind::OpBitwiseNot
            | TokenKind::OpNot
            | TokenKind::OpIncrement
            | TokenKind::OpDecrement => self.parse_unary(55),
            _ => self.parse_atom(),
        }
    }

    /// Parses a prefix unary expression with the given operand binding
    /// power.
    fn parse_unary(&mut self, operand_bp: u8) -> NodeId {
        let start = self.current_span();
        let op = self.advance().kind();
        let operand = self.parse_expression_bp(operand_bp);
        let node = self.ast.alloc(NodeKind::Unary { op, operand }, start);
        self.ast.adopt(node, operand);
        node
    }

    /// Parses an `await` expression.
    ///
    /// The operand is a full expression: `await a + b` awaits `a + b`.
    fn parse_await(&mut self) -> NodeId {
        let start = self.current_span();
        self.advance();
        let value = self.parse_expression();
        let node = self.ast.alloc(NodeKind::Await { value }, start);
        self.ast.adopt(node, value);
        node
    }

    /// Parses an atom: identifier, literal, keyword constant, or
    /// parenthesized group.
    fn parse_atom(&mut self) -> NodeId {
        let span = self.current_span();
        match self.current_kind() {
            TokenKind::Identifier => {
                let token = self.advance();
                self.ast.alloc(
                    NodeKind::Name {
                        text: token.text().into(),
                    },
                    span,
                )
            }
            TokenKind::KeywordSelf => {
                self.advance();
                self.ast.alloc(NodeKind::Name { text: "self".into() }, span)
            }
            TokenKind::IntegerLiteral => self.literal_atom(LiteralKind::Integer),
            TokenKind::RealLiteral => self.literal_atom(LiteralKind::Real),
            TokenKind::StringLiteral => self.literal_atom(LiteralKind::String),
            TokenKind::CharLiteral => self.literal_atom(LiteralKind::Character),
            TokenKind::KeywordTrue => self.literal_atom(LiteralKind::True),
            TokenKind::KeywordFalse => self.literal_atom(LiteralKind::False),
            TokenKind::KeywordNull => self.literal_atom(LiteralKind::Null),
            TokenKind::OpLeftParen => {
                self.advance();
                let inner = self.parse_expression();
                self.expect(
                    TokenKind::OpRightParen,
                    "expected `)` to close parenthesized expression",
                );
                // Grouping parens affect structure only; the emitters
                // re-derive them from operator precedence.
                inner
            }
            TokenKind::Invalid => {
                // The lexer already reported this token; don't pile a
                // second diagnostic on it.
                let token = self.advance();
                self.statement_error = true;
                self.ast.alloc(
                    NodeKind::Error {
                        message: format!("invalid token `{token}`").into(),
                    },
                    span,
                )
            }
            _ => {
                let message = format!(
                    "expected expression, found `{}`",
                    self.current_token()
                );
                self.error_node(message)
            }
        }
    }

    /// Consumes a literal token into a [`NodeKind::Literal`] node,
    /// keeping the raw source text.
    fn literal_atom(&mut self, kind: LiteralKind) -> NodeId {
        let span = self.current_span();
        let token = self.advance();
        self.ast.alloc(
            NodeKind::Literal {
                kind,
                text: token.text().into(),
            },
            span,
        )
    }

}

#[cfg(test)]
mod tests {
    use crate::ast::{LiteralKind, NodeKind};
    use crate::source_analysis::parser::tests::parse_source;
    use crate::source_analysis::TokenKind;

    #[test]
    fn grouping_parens_change_structure_without_a_node() {
        let (ast, root, diagnostics) = parse_source("(a + b) * c");
        assert!(diagnostics.is_empty());
        let NodeKind::Module { body } = ast.kind(root) else {
            panic!("expected module");
        };
        let NodeKind::Binary { op, lhs, .. } = ast.kind(body[0]) else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, TokenKind::OpMultiply);
        assert!(
            matches!(ast.kind(*lhs), NodeKind::Binary { op: TokenKind::OpAdd, .. }),
            "grouped sum should be the left operand of `*`"
        );
    }

    #[test]
    fn await_swallows_infix_expression() {
        let (ast, root, diagnostics) = parse_source("await a + b");
        assert!(diagnostics.is_empty());
        let NodeKind::Module { body } = ast.kind(root) else {
            panic!("expected module");
        };
        let NodeKind::Await { value } = ast.kind(body[0]) else {
            panic!("expected await");
        };
        assert!(matches!(
            ast.kind(*value),
            NodeKind::Binary { op: TokenKind::OpAdd, .. }
        ));
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let (ast, root, diagnostics) = parse_source("not a == b");
        assert!(diagnostics.is_empty());
        let NodeKind::Module { body } = ast.kind(root) else {
            panic!("expected module");
        };
        let NodeKind::Unary { op, operand } = ast.kind(body[0]) else {
            panic!("expected unary, got {:?}", ast.kind(body[0]));
        };
        assert_eq!(*op, TokenKind::KeywordNot);
        assert!(matches!(
            ast.kind(*operand),
            NodeKind::Binary { op: TokenKind::OpEquals, .. }
        ));
    }

    #[test]
    fn unary_minus_binds_tighter_than_multiplication() {
        let (ast, root, diagnostics) = parse_source("-a * b");
        assert!(diagnostics.is_empty());
        let NodeKind::Module { body } = ast.kind(root) else {
            panic!("expected module");
        };
        let NodeKind::Binary { op, lhs, .. } = ast.kind(body[0]) else {
            panic!("expected binary, got {:?}", ast.kind(body[0]));
        };
        assert_eq!(*op, TokenKind::OpMultiply);
        assert!(matches!(
            ast.kind(*lhs),
            NodeKind::Unary { op: TokenKind::OpSubtract, .. }
        ));
    }

    #[test]
    fn keyword_constants_are_literals() {
        let (ast, root, diagnostics) = parse_source("x = null");
        assert!(diagnostics.is_empty());
        let NodeKind::Module { body } = ast.kind(root) else {
            panic!("expected module");
        };
        let NodeKind::Binary { rhs, .. } = ast.kind(body[0]) else {
            panic!("expected assignment");
        };
        assert!(matches!(
            ast.kind(*rhs),
            NodeKind::Literal { kind: LiteralKind::Null, text } if text == "null"
        ));
    }

    #[test]
    fn unclosed_paren_reports_and_recovers() {
        let (_, _, diagnostics) = parse_source("(a + b");
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn self_is_a_name() {
        let (ast, root, diagnostics) = parse_source("self");
        assert!(diagnostics.is_empty());
        let NodeKind::Module { body } = ast.kind(root) else {
            panic!("expected module");
        };
        assert!(matches!(
            ast.kind(body[0]),
            NodeKind::Name { text } if text == "self"
        ));
    }
}
