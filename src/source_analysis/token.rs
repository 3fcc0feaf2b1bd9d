// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Token types for Vela lexical analysis.
//!
//! Each token consists of:
//! - A [`TokenKind`] indicating the syntactic category
//! - The raw source text (empty for synthesized structural tokens)
//! - A [`Span`] indicating its location in source
//!
//! [`TokenKind`] is a fieldless enum with explicit discriminants: keywords
//! and operators each occupy a contiguous ordinal range, so "is this a
//! keyword" is a constant-time range check rather than a table lookup.

use ecow::EcoString;

use super::Span;

/// The kind of token, not including source text or location.
///
/// Discriminants are grouped into ranges: operators occupy `40..=83` and
/// keywords `90..=117`. [`TokenKind::is_operator`] and
/// [`TokenKind::is_keyword`] rely on this layout.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unclassified token (never produced by a finished lexer pass).
    Unknown = 0,
    /// Malformed input recovered into a single token.
    Invalid = 1,

    /// An identifier: `foo`, `Color`, `_tmp`.
    Identifier = 2,

    /// A character literal: `'a'`, `'\n'`.
    CharLiteral = 10,
    /// A string literal: `"hello"`.
    StringLiteral = 11,
    /// An integer literal: `42`.
    IntegerLiteral = 12,
    /// A real (floating-point) literal: `3.14`, `1e9`.
    RealLiteral = 13,

    // === Operators (contiguous range) ===
    OpLeftParen = 40,
    OpRightParen = 41,
    OpLeftBracket = 42,
    OpRightBracket = 43,
    OpLeftBrace = 44,
    OpRightBrace = 45,
    OpDot = 46,
    OpComma = 47,
    OpColon = 48,
    OpSemicolon = 49,
    OpIncrement = 50,
    OpDecrement = 51,
    OpNot = 52,
    OpBitwiseNot = 53,
    OpMultiply = 54,
    OpDivide = 55,
    OpRemainder = 56,
    OpAdd = 57,
    OpSubtract = 58,
    OpLeftShift = 59,
    OpRightShift = 60,
    OpLessThan = 61,
    OpLessThanOrEqual = 62,
    OpGreaterThan = 63,
    OpGreaterThanOrEqual = 64,
    OpEquals = 65,
    OpNotEquals = 66,
    OpBitwiseAnd = 67,
    OpExclusiveOr = 68,
    OpBitwiseOr = 69,
    OpAndAnd = 70,
    OpOrOr = 71,
    OpAssign = 72,
    OpAddAssign = 73,
    OpSubtractAssign = 74,
    OpMultiplyAssign = 75,
    OpDivideAssign = 76,
    OpRemainderAssign = 77,
    OpBitwiseAndAssign = 78,
    OpBitwiseOrAssign = 79,
    OpExclusiveOrAssign = 80,
    OpLeftShiftAssign = 81,
    OpRightShiftAssign = 82,
    OpRightArrow = 83,

    // === Keywords (contiguous range) ===
    KeywordAnd = 90,
    KeywordAs = 91,
    KeywordAwait = 92,
    KeywordBreak = 93,
    KeywordClass = 94,
    KeywordConst = 95,
    KeywordContinue = 96,
    KeywordElif = 97,
    KeywordElse = 98,
    KeywordEnum = 99,
    KeywordFalse = 100,
    KeywordFor = 101,
    KeywordIf = 102,
    KeywordIn = 103,
    KeywordIs = 104,
    KeywordNot = 105,
    KeywordNull = 106,
    KeywordOr = 107,
    KeywordPass = 108,
    KeywordPrivate = 109,
    KeywordPublic = 110,
    KeywordReadonly = 111,
    KeywordReturn = 112,
    KeywordSelf = 113,
    KeywordStatic = 114,
    KeywordTrue = 115,
    KeywordWhile = 116,
    KeywordYield = 117,

    // === Structural (synthesized) ===
    /// End of a logical line.
    Newline = 130,
    /// Indentation level increased.
    Indent = 131,
    /// Indentation level decreased.
    Outdent = 132,
    /// End of the token stream (exactly one per stream).
    EndOfFile = 133,
}

impl TokenKind {
    /// Returns `true` if this kind lies in the keyword ordinal range.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        let d = self as u16;
        d >= Self::KeywordAnd as u16 && d <= Self::KeywordYield as u16
    }

    /// Returns `true` if this kind lies in the operator ordinal range.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        let d = self as u16;
        d >= Self::OpLeftParen as u16 && d <= Self::OpRightArrow as u16
    }

    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::CharLiteral | Self::StringLiteral | Self::IntegerLiteral | Self::RealLiteral
        )
    }

    /// Returns `true` if this token can form a constant expression:
    /// a literal, or one of the keyword constants `true`/`false`/`null`.
    #[must_use]
    pub const fn is_constant(self) -> bool {
        self.is_literal()
            || matches!(self, Self::KeywordTrue | Self::KeywordFalse | Self::KeywordNull)
    }

    /// Returns `true` if this is a synthesized structural token.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Newline | Self::Indent | Self::Outdent | Self::EndOfFile
        )
    }

    /// Returns `true` if this token is a definition modifier keyword.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::KeywordPublic
                | Self::KeywordPrivate
                | Self::KeywordStatic
                | Self::KeywordConst
                | Self::KeywordReadonly
        )
    }

    /// Returns `true` if this modifier controls visibility.
    #[must_use]
    pub const fn is_access_modifier(self) -> bool {
        matches!(self, Self::KeywordPublic | Self::KeywordPrivate)
    }

    /// Looks up the keyword kind for an identifier, if it is one.
    ///
    /// Matching is case-sensitive against the closed keyword table.
    #[must_use]
    pub fn keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "and" => Self::KeywordAnd,
            "as" => Self::KeywordAs,
            "await" => Self::KeywordAwait,
            "break" => Self::KeywordBreak,
            "class" => Self::KeywordClass,
            "const" => Self::KeywordConst,
            "continue" => Self::KeywordContinue,
            "elif" => Self::KeywordElif,
            "else" => Self::KeywordElse,
            "enum" => Self::KeywordEnum,
            "false" => Self::KeywordFalse,
            "for" => Self::KeywordFor,
            "if" => Self::KeywordIf,
            "in" => Self::KeywordIn,
            "is" => Self::KeywordIs,
            "not" => Self::KeywordNot,
            "null" => Self::KeywordNull,
            "or" => Self::KeywordOr,
            "pass" => Self::KeywordPass,
            "private" => Self::KeywordPrivate,
            "public" => Self::KeywordPublic,
            "readonly" => Self::KeywordReadonly,
            "return" => Self::KeywordReturn,
            "self" => Self::KeywordSelf,
            "static" => Self::KeywordStatic,
            "true" => Self::KeywordTrue,
            "while" => Self::KeywordWhile,
            "yield" => Self::KeywordYield,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the fixed source text for operators, keywords, and keyword
    /// constants. `None` for kinds whose text varies (identifiers,
    /// literals) or is empty (structural tokens).
    #[must_use]
    pub const fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            Self::OpLeftParen => "(",
            Self::OpRightParen => ")",
            Self::OpLeftBracket => "[",
            Self::OpRightBracket => "]",
            Self::OpLeftBrace => "{",
            Self::OpRightBrace => "}",
            Self::OpDot => ".",
            Self::OpComma => ",",
            Self::OpColon => ":",
            Self::OpSemicolon => ";",
            Self::OpIncrement => "++",
            Self::OpDecrement => "--",
            Self::OpNot => "!",
            Self::OpBitwiseNot => "~",
            Self::OpMultiply => "*",
            Self::OpDivide => "/",
            Self::OpRemainder => "%",
            Self::OpAdd => "+",
            Self::OpSubtract => "-",
            Self::OpLeftShift => "<<",
            Self::OpRightShift => ">>",
            Self::OpLessThan => "<",
            Self::OpLessThanOrEqual => "<=",
            Self::OpGreaterThan => ">",
            Self::OpGreaterThanOrEqual => ">=",
            Self::OpEquals => "==",
            Self::OpNotEquals => "!=",
            Self::OpBitwiseAnd => "&",
            Self::OpExclusiveOr => "^",
            Self::OpBitwiseOr => "|",
            Self::OpAndAnd => "&&",
            Self::OpOrOr => "||",
            Self::OpAssign => "=",
            Self::OpAddAssign => "+=",
            Self::OpSubtractAssign => "-=",
            Self::OpMultiplyAssign => "*=",
            Self::OpDivideAssign => "/=",
            Self::OpRemainderAssign => "%=",
            Self::OpBitwiseAndAssign => "&=",
            Self::OpBitwiseOrAssign => "|=",
            Self::OpExclusiveOrAssign => "^=",
            Self::OpLeftShiftAssign => "<<=",
            Self::OpRightShiftAssign => ">>=",
            Self::OpRightArrow => "->",
            Self::KeywordAnd => "and",
            Self::KeywordAs => "as",
            Self::KeywordAwait => "await",
            Self::KeywordBreak => "break",
            Self::KeywordClass => "class",
            Self::KeywordConst => "const",
            Self::KeywordContinue => "continue",
            Self::KeywordElif => "elif",
            Self::KeywordElse => "else",
            Self::KeywordEnum => "enum",
            Self::KeywordFalse => "false",
            Self::KeywordFor => "for",
            Self::KeywordIf => "if",
            Self::KeywordIn => "in",
            Self::KeywordIs => "is",
            Self::KeywordNot => "not",
            Self::KeywordNull => "null",
            Self::KeywordOr => "or",
            Self::KeywordPass => "pass",
            Self::KeywordPrivate => "private",
            Self::KeywordPublic => "public",
            Self::KeywordReadonly => "readonly",
            Self::KeywordReturn => "return",
            Self::KeywordSelf => "self",
            Self::KeywordStatic => "static",
            Self::KeywordTrue => "true",
            Self::KeywordWhile => "while",
            Self::KeywordYield => "yield",
            _ => return None,
        };
        Some(text)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fixed_text() {
            Some(text) => write!(f, "{text}"),
            None => match self {
                Self::Identifier => write!(f, "identifier"),
                Self::CharLiteral => write!(f, "character literal"),
                Self::StringLiteral => write!(f, "string literal"),
                Self::IntegerLiteral => write!(f, "integer literal"),
                Self::RealLiteral => write!(f, "real literal"),
                Self::Newline => write!(f, "<newline>"),
                Self::Indent => write!(f, "<indent>"),
                Self::Outdent => write!(f, "<outdent>"),
                Self::EndOfFile => write!(f, "<eof>"),
                Self::Invalid => write!(f, "<invalid>"),
                _ => write!(f, "<unknown>"),
            },
        }
    }
}

/// A token with its raw source text and location.
///
/// Tokens are immutable once produced. Literal tokens keep the raw source
/// text (including delimiters), so later stages control interpretation.
/// Synthesized structural tokens carry empty text.
///
/// # Examples
///
/// ```
/// use vela_core::source_analysis::{Position, Span, Token, TokenKind};
///
/// let span = Span::new(Position::new(0, 0), Position::new(0, 3));
/// let token = Token::new(TokenKind::Identifier, "foo", span);
/// assert_eq!(token.text(), "foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: EcoString,
    span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<EcoString>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Creates a synthesized structural token with empty text.
    #[must_use]
    pub fn structural(kind: TokenKind, at: super::Position) -> Self {
        Self {
            kind,
            text: EcoString::new(),
            span: Span::at(at),
        }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the raw source text of this token.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the source span of this token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Position;

    #[test]
    fn keyword_range_is_contiguous() {
        assert!(TokenKind::KeywordAnd.is_keyword());
        assert!(TokenKind::KeywordYield.is_keyword());
        assert!(TokenKind::KeywordEnum.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::OpAdd.is_keyword());
        assert!(!TokenKind::Newline.is_keyword());
    }

    #[test]
    fn operator_range_is_contiguous() {
        assert!(TokenKind::OpLeftParen.is_operator());
        assert!(TokenKind::OpRightArrow.is_operator());
        assert!(TokenKind::OpAssign.is_operator());
        assert!(!TokenKind::KeywordAnd.is_operator());
        assert!(!TokenKind::EndOfFile.is_operator());
    }

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::keyword("enum"), Some(TokenKind::KeywordEnum));
        assert_eq!(TokenKind::keyword("await"), Some(TokenKind::KeywordAwait));
        assert_eq!(TokenKind::keyword("Enum"), None);
        assert_eq!(TokenKind::keyword("foo"), None);
    }

    #[test]
    fn every_keyword_round_trips_through_fixed_text() {
        let kinds = [
            TokenKind::KeywordAnd,
            TokenKind::KeywordAs,
            TokenKind::KeywordAwait,
            TokenKind::KeywordBreak,
            TokenKind::KeywordClass,
            TokenKind::KeywordConst,
            TokenKind::KeywordContinue,
            TokenKind::KeywordElif,
            TokenKind::KeywordElse,
            TokenKind::KeywordEnum,
            TokenKind::KeywordFalse,
            TokenKind::KeywordFor,
            TokenKind::KeywordIf,
            TokenKind::KeywordIn,
            TokenKind::KeywordIs,
            TokenKind::KeywordNot,
            TokenKind::KeywordNull,
            TokenKind::KeywordOr,
            TokenKind::KeywordPass,
            TokenKind::KeywordPrivate,
            TokenKind::KeywordPublic,
            TokenKind::KeywordReadonly,
            TokenKind::KeywordReturn,
            TokenKind::KeywordSelf,
            TokenKind::KeywordStatic,
            TokenKind::KeywordTrue,
            TokenKind::KeywordWhile,
            TokenKind::KeywordYield,
        ];
        for kind in kinds {
            assert!(kind.is_keyword());
            let text = kind.fixed_text().expect("keyword has fixed text");
            assert_eq!(TokenKind::keyword(text), Some(kind));
        }
    }

    #[test]
    fn token_predicates() {
        assert!(TokenKind::StringLiteral.is_literal());
        assert!(TokenKind::KeywordTrue.is_constant());
        assert!(!TokenKind::KeywordTrue.is_literal());
        assert!(TokenKind::Newline.is_structural());
        assert!(TokenKind::KeywordPublic.is_access_modifier());
        assert!(TokenKind::KeywordStatic.is_modifier());
        assert!(!TokenKind::KeywordStatic.is_access_modifier());
    }

    #[test]
    fn structural_token_has_empty_text() {
        let token = Token::structural(TokenKind::Newline, Position::new(3, 7));
        assert_eq!(token.text(), "");
        assert!(token.span().is_empty());
        assert_eq!(token.span().start, Position::new(3, 7));
    }

    #[test]
    fn token_display() {
        let span = Span::at(Position::new(0, 0));
        assert_eq!(Token::new(TokenKind::Identifier, "x", span).to_string(), "x");
        assert_eq!(Token::structural(TokenKind::EndOfFile, Position::new(0, 0)).to_string(), "<eof>");
    }
}
