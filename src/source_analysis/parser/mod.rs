// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Vela source code.
//!
//! This parser builds an arena [`Ast`] from a stream of tokens.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** — the parser always produces an AST;
//!   unparseable constructs become [`NodeKind::Error`] placeholder nodes.
//! - **Multiple errors** — report all problems, don't stop at the first.
//! - **No backtracking** — each rule either commits to consumed tokens or
//!   reports a diagnostic and synthesizes a placeholder; the cursor never
//!   moves backwards except to replay a deferred body region.
//! - **Deferred bodies** — block-bodied definitions (`enum`, `class`)
//!   register their bodies with the enclosing scope and are parsed only
//!   once every sibling name in that scope is known, so siblings can
//!   refer to each other regardless of declaration order.
//!
//! # Binary Operator Precedence (Pratt Parsing)
//!
//! Binary operator precedence uses a binding power table
//! ([`binary_binding_power`]); left/right binding powers differ to encode
//! associativity. Assignment operators and `->` are right-associative,
//! everything else is left-associative.
//!
//! # Usage
//!
//! ```
//! use vela_core::diagnostics::Diagnostics;
//! use vela_core::source_analysis::{parse, tokenize, SourceBuffer};
//!
//! let buffer = SourceBuffer::from_source("x = 3 + 4");
//! let mut diagnostics = Diagnostics::new();
//! let tokens = tokenize(&buffer, &mut diagnostics);
//! let (ast, root) = parse(tokens, &mut diagnostics);
//! assert!(diagnostics.is_empty());
//! assert!(ast.spans_contain_children(root));
//! ```

use ecow::EcoString;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::diagnostics::Diagnostics;
use crate::source_analysis::{Position, Span, Token, TokenKind};

mod declarations;
mod expressions;


// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. Left and right binding powers differ for
/// associativity:
/// - Left-associative: `left == precedence`, `right == precedence + 1`
/// - Right-associative: `left == precedence + 1`, `right == precedence`
#[derive(Debug, Clone, Copy)]
pub(crate) struct BindingPower {
    /// How tightly this operator binds to its left operand.
    pub(crate) left: u8,
    /// How tightly this operator binds to its right operand.
    pub(crate) right: u8,
}

impl BindingPower {
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Gets the binding power for a binary operator token kind.
///
/// Returns `None` for kinds that are not binary operators, which the
/// Pratt loop treats as end of expression.
///
/// # Precedence Levels (from lowest to highest)
///
/// | Level | Operators                          | Associativity |
/// |-------|------------------------------------|---------------|
/// | 5     | `=` `+=` `-=` ... `<<=` `>>=`      | Right         |
/// | 8     | `->`                               | Right         |
/// | 10    | `or` `\|\|`                        | Left          |
/// | 15    | `and` `&&`                         | Left          |
/// | 20    | `<` `<=` `>` `>=` `==` `!=` `in` `is` | Left       |
/// | 25    | `\|`                               | Left          |
/// | 30    | `^`                                | Left          |
/// | 35    | `&`                                | Left          |
/// | 40    | `<<` `>>`                          | Left          |
/// | 45    | `+` `-`                            | Left          |
/// | 50    | `*` `/` `%`                        | Left          |
pub(crate) fn binary_binding_power(kind: TokenKind) -> Option<BindingPower> {
    use TokenKind as T;
    let bp = match kind {
        T::OpAssign
        | T::OpAddAssign
        | T::OpSubtractAssign
        | T::OpMultiplyAssign
        | T::OpDivideAssign
        | T::OpRemainderAssign
        | T::OpBitwiseAndAssign
        | T::OpBitwiseOrAssign
        | T::OpExclusiveOrAssign
        | T::OpLeftShiftAssign
        | T::OpRightShiftAssign => BindingPower::right_assoc(5),

        T::OpRightArrow => BindingPower::right_assoc(8),

        T::KeywordOr | T::OpOrOr => BindingPower::left_assoc(10),
        T::KeywordAnd | T::OpAndAnd => BindingPower::left_assoc(15),

        T::OpLessThan
        | T::OpLessThanOrEqual
        | T::OpGreaterThan
        | T::OpGreaterThanOrEqual
        | T::OpEquals
        | T::OpNotEquals
        | T::KeywordIn
        | T::KeywordIs => BindingPower::left_assoc(20),

        T::OpBitwiseOr => BindingPower::left_assoc(25),
        T::OpExclusiveOr => BindingPower::left_assoc(30),
        T::OpBitwiseAnd => BindingPower::left_assoc(35),

        T::OpLeftShift | T::OpRightShift => BindingPower::left_assoc(40),
        T::OpAdd | T::OpSubtract => BindingPower::left_assoc(45),
        T::OpMultiply | T::OpDivide | T::OpRemainder => BindingPower::left_assoc(50),

        _ => return None,
    };
    Some(bp)
}

/// Parses a token sequence into an AST.
///
/// This is the main entry point for parsing. It always returns a tree
/// rooted at a [`NodeKind::Module`] node, even when the input is
/// malformed; check `diagnostics` for errors.
///
/// # Examples
///
/// ```
/// use vela_core::ast::NodeKind;
/// use vela_core::diagnostics::Diagnostics;
/// use vela_core::source_analysis::{parse, tokenize, SourceBuffer};
///
/// let buffer = SourceBuffer::from_source("await x");
/// let mut diagnostics = Diagnostics::new();
/// let tokens = tokenize(&buffer, &mut diagnostics);
/// let (ast, root) = parse(tokens, &mut diagnostics);
/// assert!(matches!(ast.kind(root), NodeKind::Module { .. }));
/// ```
#[must_use]
pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> (Ast, NodeId) {
    let mut parser = Parser::new(tokens, diagnostics);
    let root = parser.parse_module();
    let mut ast = parser.ast;
    // Deferred bodies attach children after ancestor spans were first
    // computed; restore the containment invariant in one pass.
    ast.finalize_spans(root);
    (ast, root)
}

/// Maximum nesting depth for expressions before the parser bails out.
///
/// Prevents stack overflow on deeply nested input (e.g. `((((...))))`).
/// `stacker::maybe_grow` at the recursive entry point is the second line
/// of defence.
const MAX_NESTING_DEPTH: usize = 64;

/// Which grammar rule a deferred body belongs to.
#[derive(Debug, Clone, Copy)]
pub(super) enum BodyKind {
    Enum,
    Class,
}

/// A deferred body-parse task registered with an enclosing scope.
#[derive(Debug)]
pub(super) struct PendingBody {
    /// The definition node whose body is pending.
    pub(super) node: NodeId,
    /// Token cursor at the start of the (skipped) body.
    pub(super) cursor: usize,
    /// Which body grammar to apply.
    pub(super) kind: BodyKind,
}

/// A lexical scope during parsing: the names declared directly in it and
/// the body-parse tasks its members have registered.
#[derive(Debug, Default)]
pub(super) struct Scope {
    /// Names of member definitions, in registration order.
    pub(super) names: Vec<(EcoString, NodeId)>,
    /// Deferred body tasks, drained once the scope's statement list is
    /// complete.
    pub(super) pending: Vec<PendingBody>,
}

/// The parser state.
pub(super) struct Parser<'diag> {
    /// The tokens being parsed; never mutated, only indexed.
    pub(super) tokens: Vec<Token>,
    /// Current token index.
    pub(super) current: usize,
    /// The arena being built.
    pub(super) ast: Ast,
    /// Shared diagnostics sink.
    pub(super) diagnostics: &'diag mut Diagnostics,
    /// Open scopes, innermost last.
    pub(super) scopes: Vec<Scope>,
    /// Whether the current statement already produced an error node;
    /// suppresses the cascading "expected end of line" diagnostic.
    pub(super) statement_error: bool,
    /// Current expression nesting depth (guards against stack overflow).
    nesting_depth: usize,
}

impl<'diag> Parser<'diag> {
    fn new(mut tokens: Vec<Token>, diagnostics: &'diag mut Diagnostics) -> Self {
        // The lexer guarantees a terminal EOF token, but `parse` accepts
        // arbitrary sequences; repair the invariant if needed.
        if tokens.last().map(Token::kind) != Some(TokenKind::EndOfFile) {
            let at = tokens.last().map_or(Position::default(), |t| t.span().end);
            tokens.push(Token::structural(TokenKind::EndOfFile, at));
        }
        Self {
            tokens,
            current: 0,
            ast: Ast::new(),
            diagnostics,
            scopes: Vec::new(),
            statement_error: false,
            nesting_depth: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        if self.current < self.tokens.len() {
            &self.tokens[self.current]
        } else {
            // Past the end: fall back to the terminal EOF token.
            self.tokens.last().expect("token stream has an EOF token")
        }
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> TokenKind {
        self.current_token().kind()
    }

    /// Returns the current token's span.
    pub(super) fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Peeks at the next token kind without consuming.
    pub(super) fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.current + 1).map(Token::kind)
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::EndOfFile
    }

    /// Advances to the next token and returns the consumed one.
    pub(super) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current.saturating_sub(1)].clone()
    }

    /// Checks if the current token matches the given kind.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consumes the current token if it matches the given kind.
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects the current token to match the given kind, advancing if it
    /// does. Otherwise reports a diagnostic at the current position and
    /// returns `None`.
    pub(super) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            let span = self.current_span();
            self.diagnostics.error(message, span);
            self.statement_error = true;
            None
        }
    }

    /// Returns the span of the most recently consumed token.
    pub(super) fn prev_span(&self) -> Span {
        if self.current == 0 {
            self.current_span()
        } else {
            self.tokens[self.current - 1].span()
        }
    }

    /// Returns the kind of the most recently consumed token.
    pub(super) fn prev_kind(&self) -> Option<TokenKind> {
        self.current
            .checked_sub(1)
            .map(|index| self.tokens[index].kind())
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports a diagnostic and synthesizes an error placeholder node
    /// spanning the offending token.
    ///
    /// The offending token is consumed unless it is structural, so the
    /// enclosing statement's synchronization still sees line boundaries.
    pub(super) fn error_node(&mut self, message: impl Into<EcoString>) -> NodeId {
        let message = message.into();
        let span = self.current_span();
        self.diagnostics.error(message.clone(), span);
        self.statement_error = true;
        if !self.current_kind().is_structural() {
            self.advance();
        }
        self.ast.alloc(NodeKind::Error { message }, span)
    }

    /// Skips tokens until a statement boundary: just past a `Newline`, or
    /// at an `Outdent`, `}` or end of input.
    pub(super) fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                TokenKind::Outdent | TokenKind::OpRightBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Guards against stack overflow from deeply nested expressions.
    ///
    /// Returns an error placeholder when the nesting limit is exceeded.
    pub(super) fn enter_nesting(&mut self) -> Result<(), NodeId> {
        self.nesting_depth += 1;
        if self.nesting_depth > MAX_NESTING_DEPTH {
            self.nesting_depth -= 1;
            let span = self.current_span();
            self.diagnostics
                .error("expression is nested too deeply", span);
            self.statement_error = true;
            // Consume the offending token to guarantee progress.
            if !self.current_kind().is_structural() {
                self.advance();
            }
            return Err(self.ast.alloc(
                NodeKind::Error {
                    message: "expression is nested too deeply".into(),
                },
                span,
            ));
        }
        Ok(())
    }

    pub(super) fn leave_nesting(&mut self) {
        self.nesting_depth -= 1;
    }

    // ========================================================================
    // Scopes & Deferred Bodies
    // ========================================================================

    /// Opens a new scope for a block construct.
    pub(super) fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Registers a named definition and its deferred body with the
    /// innermost scope, reporting a redefinition of an existing sibling
    /// name.
    pub(super) fn register_named_node(
        &mut self,
        name: EcoString,
        node: NodeId,
        cursor: usize,
        kind: BodyKind,
        name_span: Span,
    ) {
        let scope = self.scopes.last_mut().expect("a scope is open");
        if scope.names.iter().any(|(existing, _)| *existing == name) {
            self.diagnostics.error(
                format!("`{name}` is already defined in this scope"),
                name_span,
            );
        }
        scope.names.push((name, node));
        scope.pending.push(PendingBody { node, cursor, kind });
    }

    /// Closes the innermost scope, parsing all deferred bodies in
    /// registration order.
    ///
    /// By the time this runs, every sibling name in the scope has been
    /// registered, so bodies can refer to siblings declared later in the
    /// block.
    pub(super) fn drain_scope(&mut self) {
        let scope = self.scopes.pop().expect("a scope is open");
        for task in scope.pending {
            let resume = self.current;
            self.current = task.cursor;
            match task.kind {
                BodyKind::Enum => self.parse_enum_body(task.node),
                BodyKind::Class => self.parse_class_body(task.node),
            }
            self.current = resume;
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parses the whole token stream as a module.
    pub(super) fn parse_module(&mut self) -> NodeId {
        let start = self.current_span();
        let module = self
            .ast
            .alloc(NodeKind::Module { body: Vec::new() }, start);
        self.push_scope();

        let mut body = Vec::new();
        self.skip_statement_separators();
        while !self.is_at_end() {
            let statement = self.parse_statement();
            self.ast.adopt(module, statement);
            body.push(statement);
            self.skip_statement_separators();
        }

        self.drain_scope();
        if let NodeKind::Module { body: slot } = self.ast.kind_mut(module) {
            *slot = body;
        }
        self.ast.finish_span(module, self.prev_span());
        module
    }

    /// Skips statement separators: newlines and stray indentation tokens.
    pub(super) fn skip_statement_separators(&mut self) {
        while matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Indent | TokenKind::Outdent
        ) {
            self.advance();
        }
    }

    /// Parses one statement and its terminator.
    pub(super) fn parse_statement(&mut self) -> NodeId {
        self.statement_error = false;
        let statement = match self.current_kind() {
            TokenKind::KeywordEnum | TokenKind::KeywordClass => self.parse_definition(Vec::new()),
            kind if kind.is_modifier() => {
                let modifiers = self.parse_modifiers();
                self.parse_definition(modifiers)
            }
            TokenKind::KeywordReturn => self.parse_return(),
            TokenKind::KeywordPass => {
                let span = self.current_span();
                self.advance();
                self.ast.alloc(NodeKind::Pass, span)
            }
            _ => self.parse_expression(),
        };
        self.expect_statement_end();
        statement
    }

    /// Consumes the statement terminator, or reports one diagnostic and
    /// synchronizes to the next statement boundary.
    ///
    /// A statement that ends in an indented body has already consumed its
    /// closing outdent; the line's newline was swallowed with the body,
    /// so no further terminator is required.
    fn expect_statement_end(&mut self) {
        if self.prev_kind() == Some(TokenKind::Outdent) {
            return;
        }
        match self.current_kind() {
            TokenKind::Newline => {
                self.advance();
            }
            TokenKind::Outdent | TokenKind::OpRightBrace | TokenKind::EndOfFile => {}
            _ => {
                // A statement that already failed has reported its own
                // diagnostic; don't pile a second one on the same line.
                if !self.statement_error {
                    let span = self.current_span();
                    self.diagnostics.error(
                        format!("expected end of line, found `{}`", self.current_token()),
                        span,
                    );
                }
                self.synchronize();
            }
        }
    }

    /// Parses a `return` statement with optional value.
    fn parse_return(&mut self) -> NodeId {
        let start = self.current_span();
        self.advance();
        let value = if matches!(
            self.current_kind(),
            TokenKind::Newline
                | TokenKind::Outdent
                | TokenKind::OpRightBrace
                | TokenKind::EndOfFile
        ) {
            None
        } else {
            Some(self.parse_expression())
        };
        let node = self.ast.alloc(NodeKind::Return { value }, start);
        if let Some(value) = value {
            self.ast.adopt(node, value);
        }
        self.ast.finish_span(node, self.prev_span());
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LiteralKind;
    use crate::source_analysis::{tokenize, SourceBuffer};

    pub(crate) fn parse_source(source: &str) -> (Ast, NodeId, Diagnostics) {
        let buffer = SourceBuffer::from_source(source);
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(&buffer, &mut diagnostics);
        let (ast, root) = parse(tokens, &mut diagnostics);
        (ast, root, diagnostics)
    }

    fn module_body(ast: &Ast, root: NodeId) -> Vec<NodeId> {
        match ast.kind(root) {
            NodeKind::Module { body } => body.clone(),
            other => panic!("expected module, got {other:?}"),
        }
    }

    #[test]
    fn await_identifier() {
        let (ast, root, diagnostics) = parse_source("await x");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        assert_eq!(body.len(), 1);
        let NodeKind::Await { value } = ast.kind(body[0]) else {
            panic!("expected await expression");
        };
        assert!(
            matches!(ast.kind(*value), NodeKind::Name { text } if text == "x"),
            "await operand should be the identifier `x`"
        );
    }

    #[test]
    fn binary_precedence() {
        let (ast, root, diagnostics) = parse_source("a + b * c");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        let NodeKind::Binary { op, lhs, rhs } = ast.kind(body[0]) else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, TokenKind::OpAdd);
        assert!(matches!(ast.kind(*lhs), NodeKind::Name { .. }));
        assert!(
            matches!(ast.kind(*rhs), NodeKind::Binary { op: TokenKind::OpMultiply, .. }),
            "multiplication should bind tighter than addition"
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        let (ast, root, diagnostics) = parse_source("a = b = 1");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        let NodeKind::Binary { op, rhs, .. } = ast.kind(body[0]) else {
            panic!("expected assignment");
        };
        assert_eq!(*op, TokenKind::OpAssign);
        assert!(
            matches!(ast.kind(*rhs), NodeKind::Binary { op: TokenKind::OpAssign, .. }),
            "assignment should nest to the right"
        );
    }

    #[test]
    fn comparison_chain_is_left_associative() {
        let (ast, root, diagnostics) = parse_source("a - b - c");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        let NodeKind::Binary { lhs, rhs, .. } = ast.kind(body[0]) else {
            panic!("expected binary expression");
        };
        assert!(matches!(ast.kind(*lhs), NodeKind::Binary { .. }));
        assert!(matches!(ast.kind(*rhs), NodeKind::Name { .. }));
    }

    #[test]
    fn keyword_operators_parse() {
        let (ast, root, diagnostics) = parse_source("a and b or not c");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        let NodeKind::Binary { op, rhs, .. } = ast.kind(body[0]) else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, TokenKind::KeywordOr);
        assert!(matches!(
            ast.kind(*rhs),
            NodeKind::Unary { op: TokenKind::KeywordNot, .. }
        ));
    }

    #[test]
    fn return_with_and_without_value() {
        let (ast, root, diagnostics) = parse_source("return 1\nreturn");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        assert_eq!(body.len(), 2);
        assert!(matches!(ast.kind(body[0]), NodeKind::Return { value: Some(_) }));
        assert!(matches!(ast.kind(body[1]), NodeKind::Return { value: None }));
    }

    #[test]
    fn literals_keep_raw_text() {
        let (ast, root, diagnostics) = parse_source("x = 3.14");
        assert!(diagnostics.is_empty());
        let body = module_body(&ast, root);
        let NodeKind::Binary { rhs, .. } = ast.kind(body[0]) else {
            panic!("expected assignment");
        };
        assert!(matches!(
            ast.kind(*rhs),
            NodeKind::Literal { kind: LiteralKind::Real, text } if text == "3.14"
        ));
    }

    #[test]
    fn three_bad_statements_yield_three_diagnostics() {
        let (_, _, diagnostics) = parse_source("= 1\n* 2\n/ 3");
        assert_eq!(diagnostics.len(), 3, "{diagnostics:?}");
    }

    #[test]
    fn error_statement_produces_placeholder_node() {
        let (ast, root, diagnostics) = parse_source("* 2");
        assert_eq!(diagnostics.len(), 1);
        let body = module_body(&ast, root);
        assert_eq!(body.len(), 1);
        assert!(matches!(ast.kind(body[0]), NodeKind::Error { .. }));
    }

    #[test]
    fn recovery_continues_after_bad_line() {
        let (ast, root, diagnostics) = parse_source("= oops\nawait x");
        assert_eq!(diagnostics.len(), 1);
        let body = module_body(&ast, root);
        assert_eq!(body.len(), 2);
        assert!(matches!(ast.kind(body[1]), NodeKind::Await { .. }));
    }

    #[test]
    fn span_containment_holds_for_parsed_trees() {
        let sources = [
            "await x",
            "a + b * c",
            "enum Color { Red, Green, Blue }",
            "class Point(Object)\n  x = 1\n  y = 2",
            "return 1 + 2",
        ];
        for source in sources {
            let (ast, root, _) = parse_source(source);
            assert!(ast.spans_contain_children(root), "source: {source:?}");
        }
    }

    #[test]
    fn deeply_nested_expression_is_rejected_gracefully() {
        let source = format!("{}x{}", "(".repeat(300), ")".repeat(300));
        let (_, _, diagnostics) = parse_source(&source);
        assert!(diagnostics.has_errors());
    }
}
