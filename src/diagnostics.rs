// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! The diagnostics sink.
//!
//! Every recoverable problem in the front end — lexical, syntactic, or
//! emission-legality — is recorded here as a [`Diagnostic`] and processing
//! continues, so one pass over a file yields the maximal set of problems.
//! The sink is append-only and single-threaded; a compilation unit owns
//! exactly one.
//!
//! Diagnostics are stored in insertion order (depth-first parse order,
//! which approximates source order). Renderers that want strict source
//! order use [`Diagnostics::sorted_by_anchor`].

use ecow::EcoString;

use crate::source_analysis::Span;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A problem that marks the stage as failed.
    Error,
    /// A problem worth reporting that does not fail the stage.
    Warning,
}

/// A diagnostic message anchored to a source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The message text.
    pub message: EcoString,
    /// The source location the message is anchored to.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }
}

/// An ordered, append-only collection of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Appends an error diagnostic.
    pub fn error(&mut self, message: impl Into<EcoString>, span: Span) {
        self.report(Diagnostic::error(message, span));
    }

    /// Appends a warning diagnostic.
    pub fn warning(&mut self, message: impl Into<EcoString>, span: Span) {
        self.report(Diagnostic::warning(message, span));
    }

    /// Returns true if no diagnostics have been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of reported diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if any diagnostic has [`Severity::Error`].
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Iterates diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Returns a copy sorted by anchor start position, stable on ties.
    ///
    /// This is the documented user-facing order; the stored order remains
    /// insertion order.
    #[must_use]
    pub fn sorted_by_anchor(&self) -> Vec<Diagnostic> {
        let mut sorted = self.items.clone();
        sorted.sort_by_key(|d| d.span.start);
        sorted
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::Position;

    fn span(line: u32, column: u32) -> Span {
        Span::at(Position::new(line, column))
    }

    #[test]
    fn report_preserves_insertion_order() {
        let mut sink = Diagnostics::new();
        sink.error("second by position", span(2, 0));
        sink.warning("first by position", span(0, 0));

        let messages: Vec<_> = sink.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["second by position", "first by position"]);
    }

    #[test]
    fn sorted_by_anchor_is_stable() {
        let mut sink = Diagnostics::new();
        sink.error("a", span(1, 0));
        sink.error("b", span(0, 0));
        sink.error("c", span(1, 0));

        let sorted = sink.sorted_by_anchor();
        let messages: Vec<_> = sorted.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["b", "a", "c"]);
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let mut sink = Diagnostics::new();
        sink.warning("just a warning", span(0, 0));
        assert!(!sink.has_errors());
        assert!(!sink.is_empty());

        sink.error("now an error", span(0, 1));
        assert!(sink.has_errors());
        assert_eq!(sink.len(), 2);
    }
}
