// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Vela source code.
//!
//! [`tokenize`] converts a [`SourceBuffer`] into a stream of [`Token`]s.
//! The lexer is hand-written for maximum control over error recovery.
//!
//! # Design Principles
//!
//! - **Error recovery**: never fail on malformed input; emit a
//!   [`TokenKind::Invalid`] token plus a diagnostic and keep scanning.
//! - **Progress**: every step consumes at least one character, so lexing
//!   any finite input terminates.
//! - **Structural synthesis**: logical line ends produce `Newline`,
//!   indentation deltas produce balanced `Indent`/`Outdent`, and the
//!   stream always ends with exactly one `EndOfFile`.
//!
//! # Example
//!
//! ```
//! use vela_core::diagnostics::Diagnostics;
//! use vela_core::source_analysis::{tokenize, SourceBuffer, TokenKind};
//!
//! let buffer = SourceBuffer::from_source("x + 1");
//! let mut diagnostics = Diagnostics::new();
//! let tokens = tokenize(&buffer, &mut diagnostics);
//! assert_eq!(tokens.last().unwrap().kind(), TokenKind::EndOfFile);
//! ```

use ecow::EcoString;

use crate::diagnostics::Diagnostics;

use super::buffer::{END_OF_LINE, END_OF_STREAM};
use super::{Position, SourceBuffer, Span, Token, TokenKind};

/// Tokenizes a source buffer, reporting lexical problems to `diagnostics`.
///
/// Never fails: malformed input becomes [`TokenKind::Invalid`] tokens.
/// The returned sequence always ends with exactly one
/// [`TokenKind::EndOfFile`].
#[must_use]
pub fn tokenize(buffer: &SourceBuffer, diagnostics: &mut Diagnostics) -> Vec<Token> {
    Lexer::new(buffer, diagnostics).run()
}

/// Maximum operator length for maximal-munch matching.
const MAX_OPERATOR_LEN: usize = 3;

/// Looks up the operator kind for a piece of source text.
///
/// Callers try the longest candidate first (maximal munch), so `>=` wins
/// over `>` followed by `=`.
fn operator_kind(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "(" => TokenKind::OpLeftParen,
        ")" => TokenKind::OpRightParen,
        "[" => TokenKind::OpLeftBracket,
        "]" => TokenKind::OpRightBracket,
        "{" => TokenKind::OpLeftBrace,
        "}" => TokenKind::OpRightBrace,
        "." => TokenKind::OpDot,
        "," => TokenKind::OpComma,
        ":" => TokenKind::OpColon,
        ";" => TokenKind::OpSemicolon,
        "++" => TokenKind::OpIncrement,
        "--" => TokenKind::OpDecrement,
        "!" => TokenKind::OpNot,
        "~" => TokenKind::OpBitwiseNot,
        "*" => TokenKind::OpMultiply,
        "/" => TokenKind::OpDivide,
        "%" => TokenKind::OpRemainder,
        "+" => TokenKind::OpAdd,
        "-" => TokenKind::OpSubtract,
        "<<" => TokenKind::OpLeftShift,
        ">>" => TokenKind::OpRightShift,
        "<" => TokenKind::OpLessThan,
        "<=" => TokenKind::OpLessThanOrEqual,
        ">" => TokenKind::OpGreaterThan,
        ">=" => TokenKind::OpGreaterThanOrEqual,
        "==" => TokenKind::OpEquals,
        "!=" => TokenKind::OpNotEquals,
        "&" => TokenKind::OpBitwiseAnd,
        "^" => TokenKind::OpExclusiveOr,
        "|" => TokenKind::OpBitwiseOr,
        "&&" => TokenKind::OpAndAnd,
        "||" => TokenKind::OpOrOr,
        "=" => TokenKind::OpAssign,
        "+=" => TokenKind::OpAddAssign,
        "-=" => TokenKind::OpSubtractAssign,
        "*=" => TokenKind::OpMultiplyAssign,
        "/=" => TokenKind::OpDivideAssign,
        "%=" => TokenKind::OpRemainderAssign,
        "&=" => TokenKind::OpBitwiseAndAssign,
        "|=" => TokenKind::OpBitwiseOrAssign,
        "^=" => TokenKind::OpExclusiveOrAssign,
        "<<=" => TokenKind::OpLeftShiftAssign,
        ">>=" => TokenKind::OpRightShiftAssign,
        "->" => TokenKind::OpRightArrow,
        _ => return None,
    };
    Some(kind)
}

/// Lexer state for one pass over a buffer.
struct Lexer<'src, 'diag> {
    buffer: &'src SourceBuffer,
    diagnostics: &'diag mut Diagnostics,
    /// Characters of the current line (including its markers).
    line_chars: Vec<char>,
    /// Current line index.
    line: usize,
    /// Current column index within the line.
    column: usize,
    /// Whether the cursor sits at the start of a logical line.
    at_line_start: bool,
    /// Stack of active indentation widths; the base level 0 is never popped.
    indent_stack: Vec<usize>,
    tokens: Vec<Token>,
}

impl<'src, 'diag> Lexer<'src, 'diag> {
    fn new(buffer: &'src SourceBuffer, diagnostics: &'diag mut Diagnostics) -> Self {
        Self {
            buffer,
            diagnostics,
            line_chars: buffer.line(0).chars().collect(),
            line: 0,
            column: 0,
            at_line_start: true,
            indent_stack: vec![0],
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        loop {
            if self.at_line_start {
                self.handle_indentation();
                self.at_line_start = false;
            }
            match self.peek() {
                None => {
                    // Can only happen if a line is missing its markers;
                    // treat as end of stream.
                    self.finish();
                    break;
                }
                Some(END_OF_STREAM) => {
                    self.finish();
                    break;
                }
                Some(END_OF_LINE) => {
                    let at = self.position();
                    self.tokens.push(Token::structural(TokenKind::Newline, at));
                    self.advance();
                    if self.peek().is_none() {
                        self.next_line();
                    }
                }
                Some(' ' | '\t') => {
                    self.advance();
                }
                Some('#') => {
                    // Line comment: skip to the end-of-line marker.
                    while !matches!(self.peek(), Some(END_OF_LINE | END_OF_STREAM) | None) {
                        self.advance();
                    }
                }
                Some(c) => self.lex_token(c),
            }
        }
        self.tokens
    }

    /// Pops any open indentation levels and emits the terminal EOF token.
    fn finish(&mut self) {
        let at = self.position();
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::structural(TokenKind::Outdent, at));
        }
        self.tokens
            .push(Token::structural(TokenKind::EndOfFile, at));
    }

    // ========================================================================
    // Cursor management
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.line_chars.get(self.column).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.line_chars.get(self.column + offset).copied()
    }

    fn advance(&mut self) {
        self.column += 1;
    }

    fn next_line(&mut self) {
        if self.line + 1 < self.buffer.line_count() {
            self.line += 1;
            self.column = 0;
            self.line_chars = self.buffer.line(self.line).chars().collect();
            self.at_line_start = true;
        }
    }

    // Sources beyond u32 lines or columns are not supported.
    #[allow(clippy::cast_possible_truncation)]
    fn position(&self) -> Position {
        Position::new(self.line as u32, self.column as u32)
    }

    fn text_from(&self, start_column: usize) -> EcoString {
        self.line_chars[start_column..self.column]
            .iter()
            .copied()
            .collect()
    }

    fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.position())
    }

    // ========================================================================
    // Indentation
    // ========================================================================

    /// Measures leading whitespace at a line start and synthesizes
    /// `Indent`/`Outdent` tokens against the indent stack.
    ///
    /// Blank and comment-only lines are ignored: they neither push nor pop
    /// indentation levels.
    fn handle_indentation(&mut self) {
        let mut width = 0;
        while matches!(self.peek_at(width), Some(' ' | '\t')) {
            width += 1;
        }
        // Lines with no code do not affect indentation.
        if matches!(
            self.peek_at(width),
            Some(END_OF_LINE | END_OF_STREAM | '#') | None
        ) {
            return;
        }

        let at = self.position();
        let current = *self.indent_stack.last().expect("base indent level");
        if width > current {
            self.indent_stack.push(width);
            self.tokens.push(Token::structural(TokenKind::Indent, at));
        } else if width < current {
            while *self.indent_stack.last().expect("base indent level") > width {
                self.indent_stack.pop();
                self.tokens.push(Token::structural(TokenKind::Outdent, at));
            }
            if *self.indent_stack.last().expect("base indent level") != width {
                self.diagnostics.error(
                    "inconsistent dedent: indentation does not match any enclosing level",
                    Span::at(at),
                );
            }
        }
    }

    // ========================================================================
    // Token scanning
    // ========================================================================

    fn lex_token(&mut self, c: char) {
        match c {
            'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier_or_keyword(),
            '0'..='9' => self.lex_number(),
            '"' => self.lex_string(),
            '\'' => self.lex_character(),
            _ => self.lex_operator_or_invalid(c),
        }
    }

    fn lex_identifier_or_keyword(&mut self) {
        let start = self.position();
        let start_column = self.column;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let text = self.text_from(start_column);
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, text, self.span_from(start)));
    }

    fn lex_number(&mut self) {
        let start = self.position();
        let start_column = self.column;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let mut is_real = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            self.advance(); // '.'
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E'))
            && (self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
                || (matches!(self.peek_at(1), Some('+' | '-'))
                    && self.peek_at(2).is_some_and(|c| c.is_ascii_digit())))
        {
            is_real = true;
            self.advance(); // 'e'
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let kind = if is_real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        let text = self.text_from(start_column);
        self.tokens.push(Token::new(kind, text, self.span_from(start)));
    }

    /// Lexes a string literal, keeping the raw text including quotes.
    ///
    /// Strings do not span lines: an end-of-line before the closing quote
    /// produces one diagnostic and an `Invalid` token covering what was
    /// scanned, and the newline itself is left for the main loop.
    fn lex_string(&mut self) {
        let start = self.position();
        let start_column = self.column;
        self.advance(); // opening quote
        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    let text = self.text_from(start_column);
                    self.tokens.push(Token::new(
                        TokenKind::StringLiteral,
                        text,
                        self.span_from(start),
                    ));
                    return;
                }
                Some('\\') => {
                    self.advance();
                    if !matches!(self.peek(), Some(END_OF_LINE | END_OF_STREAM) | None) {
                        self.advance();
                    }
                }
                Some(END_OF_LINE | END_OF_STREAM) | None => {
                    let span = self.span_from(start);
                    self.diagnostics.error("unterminated string literal", span);
                    let text = self.text_from(start_column);
                    self.tokens.push(Token::new(TokenKind::Invalid, text, span));
                    return;
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Lexes a character literal: `'a'` or `'\n'`.
    fn lex_character(&mut self) {
        let start = self.position();
        let start_column = self.column;
        self.advance(); // opening quote
        match self.peek() {
            Some('\\') => {
                self.advance();
                if !matches!(self.peek(), Some(END_OF_LINE | END_OF_STREAM) | None) {
                    self.advance();
                }
            }
            Some('\'') => {
                self.advance();
                let span = self.span_from(start);
                self.diagnostics.error("empty character literal", span);
                let text = self.text_from(start_column);
                self.tokens.push(Token::new(TokenKind::Invalid, text, span));
                return;
            }
            Some(c) if c != END_OF_LINE && c != END_OF_STREAM => self.advance(),
            _ => {}
        }
        if self.peek() == Some('\'') {
            self.advance();
            let text = self.text_from(start_column);
            self.tokens.push(Token::new(
                TokenKind::CharLiteral,
                text,
                self.span_from(start),
            ));
        } else {
            let span = self.span_from(start);
            self.diagnostics
                .error("unterminated character literal", span);
            let text = self.text_from(start_column);
            self.tokens.push(Token::new(TokenKind::Invalid, text, span));
        }
    }

    /// Matches an operator with maximal munch, or recovers from an
    /// unexpected character.
    fn lex_operator_or_invalid(&mut self, c: char) {
        let start = self.position();
        for len in (1..=MAX_OPERATOR_LEN).rev() {
            let end = self.column + len;
            if end > self.line_chars.len() {
                continue;
            }
            let candidate: String = self.line_chars[self.column..end].iter().collect();
            if let Some(kind) = operator_kind(&candidate) {
                self.column = end;
                self.tokens
                    .push(Token::new(kind, candidate, self.span_from(start)));
                return;
            }
        }
        self.advance();
        let span = self.span_from(start);
        self.diagnostics
            .error(format!("invalid character `{c}`"), span);
        self.tokens
            .push(Token::new(TokenKind::Invalid, EcoString::from(c), span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<Token>, Diagnostics) {
        let buffer = SourceBuffer::from_source(source);
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(&buffer, &mut diagnostics);
        (tokens, diagnostics)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(Token::kind).collect()
    }

    #[test]
    fn simple_expression() {
        let (tokens, diagnostics) = lex("x + 1");
        assert!(diagnostics.is_empty());
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Identifier,
                TokenKind::OpAdd,
                TokenKind::IntegerLiteral,
                TokenKind::Newline,
                TokenKind::EndOfFile,
            ]
        );
        assert_eq!(tokens[0].text(), "x");
        assert_eq!(tokens[2].text(), "1");
    }

    #[test]
    fn maximal_munch_prefers_longest_operator() {
        let (tokens, diagnostics) = lex("a >= b >> c >>= d");
        assert!(diagnostics.is_empty());
        let ops: Vec<TokenKind> = tokens
            .iter()
            .filter(|t| t.kind().is_operator())
            .map(Token::kind)
            .collect();
        assert_eq!(
            ops,
            [
                TokenKind::OpGreaterThanOrEqual,
                TokenKind::OpRightShift,
                TokenKind::OpRightShiftAssign,
            ]
        );
    }

    #[test]
    fn keywords_are_recognized_case_sensitively() {
        let (tokens, _) = lex("enum Enum await");
        assert_eq!(tokens[0].kind(), TokenKind::KeywordEnum);
        assert_eq!(tokens[1].kind(), TokenKind::Identifier);
        assert_eq!(tokens[2].kind(), TokenKind::KeywordAwait);
    }

    #[test]
    fn real_and_integer_literals_keep_raw_text() {
        let (tokens, diagnostics) = lex("42 3.14 1e9 2.5e-3 7.");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind(), TokenKind::IntegerLiteral);
        assert_eq!(tokens[1].kind(), TokenKind::RealLiteral);
        assert_eq!(tokens[1].text(), "3.14");
        assert_eq!(tokens[2].kind(), TokenKind::RealLiteral);
        assert_eq!(tokens[3].kind(), TokenKind::RealLiteral);
        assert_eq!(tokens[3].text(), "2.5e-3");
        // `7.` is an integer followed by a dot, not a real.
        assert_eq!(tokens[4].kind(), TokenKind::IntegerLiteral);
        assert_eq!(tokens[5].kind(), TokenKind::OpDot);
    }

    #[test]
    fn string_literal_keeps_quotes_and_escapes() {
        let (tokens, diagnostics) = lex(r#"s = "a \"b\" c""#);
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[2].kind(), TokenKind::StringLiteral);
        assert_eq!(tokens[2].text(), r#""a \"b\" c""#);
    }

    #[test]
    fn unterminated_string_recovers_with_one_diagnostic() {
        let (tokens, diagnostics) = lex("\"never closed");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Invalid);
        assert_eq!(tokens.last().unwrap().kind(), TokenKind::EndOfFile);
    }

    #[test]
    fn character_literals() {
        let (tokens, diagnostics) = lex(r"'a' '\n'");
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].kind(), TokenKind::CharLiteral);
        assert_eq!(tokens[0].text(), "'a'");
        assert_eq!(tokens[1].kind(), TokenKind::CharLiteral);
        assert_eq!(tokens[1].text(), r"'\n'");
    }

    #[test]
    fn unterminated_character_literal() {
        let (tokens, diagnostics) = lex("'a");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Invalid);
    }

    #[test]
    fn invalid_character_recovers_and_continues() {
        let (tokens, diagnostics) = lex("a ` b");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Identifier,
                TokenKind::Invalid,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let (tokens, diagnostics) = lex("x # trailing comment\n# whole line\ny");
        assert!(diagnostics.is_empty());
        assert_eq!(
            kinds(&tokens),
            [
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn indent_and_outdent_are_balanced() {
        let (tokens, diagnostics) = lex("a\n  b\n    c\nd");
        assert!(diagnostics.is_empty());
        let indents = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Indent)
            .count();
        let outdents = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Outdent)
            .count();
        assert_eq!(indents, 2);
        assert_eq!(outdents, 2);
    }

    #[test]
    fn trailing_indent_is_closed_at_eof() {
        let (tokens, diagnostics) = lex("a\n  b");
        assert!(diagnostics.is_empty());
        let indents = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Indent)
            .count();
        let outdents = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Outdent)
            .count();
        assert_eq!(indents, outdents);
    }

    #[test]
    fn inconsistent_dedent_reports_one_diagnostic() {
        let (tokens, diagnostics) = lex("a\n    b\n  c");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics
            .iter()
            .next()
            .unwrap()
            .message
            .contains("inconsistent dedent"));
        assert_eq!(tokens.last().unwrap().kind(), TokenKind::EndOfFile);
    }

    #[test]
    fn blank_lines_do_not_affect_indentation() {
        let (tokens, diagnostics) = lex("a\n  b\n\n  c");
        assert!(diagnostics.is_empty());
        let indents = tokens
            .iter()
            .filter(|t| t.kind() == TokenKind::Indent)
            .count();
        assert_eq!(indents, 1);
    }

    #[test]
    fn exactly_one_eof_token() {
        for source in ["", "x", "a\nb\nc", "\"bad", "  weird\nmore"] {
            let (tokens, _) = lex(source);
            let eofs = tokens
                .iter()
                .filter(|t| t.kind() == TokenKind::EndOfFile)
                .count();
            assert_eq!(eofs, 1, "source: {source:?}");
            assert_eq!(tokens.last().unwrap().kind(), TokenKind::EndOfFile);
        }
    }

    #[test]
    fn token_spans_are_positioned() {
        let (tokens, _) = lex("ab cd");
        assert_eq!(tokens[0].span(), Span::new(Position::new(0, 0), Position::new(0, 2)));
        assert_eq!(tokens[1].span(), Span::new(Position::new(0, 3), Position::new(0, 5)));
    }
}
