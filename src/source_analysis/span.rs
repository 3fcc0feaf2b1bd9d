// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and AST node carries a [`Span`] indicating its position in
//! the source file. Positions are (line, column) pairs rather than byte
//! offsets because Vela's lexer works line-by-line over the
//! [`SourceBuffer`](super::SourceBuffer).

/// A (line, column) position in source text.
///
/// Both components are zero-based; [`std::fmt::Display`] renders them
/// one-based for human consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line index.
    pub line: u32,
    /// Zero-based column index.
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A span of source code, from a start position to an end position.
///
/// # Examples
///
/// ```
/// use vela_core::source_analysis::{Position, Span};
///
/// let span = Span::new(Position::new(0, 0), Position::new(0, 5));
/// assert!(span.contains(Span::new(Position::new(0, 1), Position::new(0, 3))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Span {
    /// Creates a new span from start and end positions.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates an empty span anchored at a single position.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns true if the span covers no source text.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` is fully contained within `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Creates a span that covers both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1), Position::new(1, 1));
    }

    #[test]
    fn span_merge() {
        let a = Span::new(Position::new(0, 2), Position::new(0, 6));
        let b = Span::new(Position::new(1, 0), Position::new(1, 4));
        let merged = a.merge(b);
        assert_eq!(merged.start, Position::new(0, 2));
        assert_eq!(merged.end, Position::new(1, 4));
    }

    #[test]
    fn span_contains() {
        let outer = Span::new(Position::new(0, 0), Position::new(2, 0));
        let inner = Span::new(Position::new(1, 3), Position::new(1, 8));
        assert!(outer.contains(inner));
        assert!(!inner.contains(outer));
    }

    #[test]
    fn span_display() {
        let span = Span::new(Position::new(0, 0), Position::new(0, 4));
        assert_eq!(span.to_string(), "1:1-1:5");
    }
}
