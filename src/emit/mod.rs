// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Source emission: rendering an [`Ast`] back into text.
//!
//! Two targets are supported:
//!
//! - [`Target::Vela`] renders the tree in Vela's own syntax. The output
//!   is structurally lossless: re-parsing it yields a structurally equal
//!   tree (spans and formatting are not preserved).
//! - [`Target::CSharp`] renders a C#-flavoured translation. Constructs
//!   that are legal in Vela but have no C# counterpart are reported to
//!   the diagnostics sink, and the emitter degrades to the closest legal
//!   rendering rather than aborting.

use crate::ast::{Ast, NodeId};
use crate::diagnostics::Diagnostics;

mod csharp;
mod vela;

/// An emission target syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Vela's own syntax.
    Vela,
    /// C#-flavoured syntax with emission-legality checking.
    CSharp,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vela => write!(f, "Vela"),
            Self::CSharp => write!(f, "C#"),
        }
    }
}

/// Renders the subtree at `root` in the given target syntax.
///
/// Emission never fails; target-legality problems are reported to
/// `diagnostics` and rendering continues.
#[must_use]
pub fn emit(ast: &Ast, root: NodeId, target: Target, diagnostics: &mut Diagnostics) -> String {
    match target {
        Target::Vela => vela::emit(ast, root),
        Target::CSharp => csharp::emit(ast, root, diagnostics),
    }
}

/// An indentation-aware output buffer shared by the emitters.
///
/// Text written at the start of a line is prefixed with the current
/// indentation; [`CodeWriter::newline`] ends the line lazily, so empty
/// lines carry no trailing whitespace.
pub(crate) struct CodeWriter {
    out: String,
    indent: usize,
    at_line_start: bool,
}

const INDENT_WIDTH: usize = 4;

impl CodeWriter {
    pub(crate) fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Writes text, inserting indentation if at the start of a line.
    pub(crate) fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent * INDENT_WIDTH {
                self.out.push(' ');
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    /// Ends the current line.
    pub(crate) fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Consumes the writer, returning the rendered text without a
    /// trailing newline.
    pub(crate) fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_indents_at_line_start_only() {
        let mut w = CodeWriter::new();
        w.write("a {");
        w.newline();
        w.indent();
        w.write("b");
        w.write(" + c");
        w.newline();
        w.outdent();
        w.write("}");
        assert_eq!(w.finish(), "a {\n    b + c\n}");
    }

    #[test]
    fn finish_trims_trailing_newlines() {
        let mut w = CodeWriter::new();
        w.write("x");
        w.newline();
        w.newline();
        assert_eq!(w.finish(), "x");
    }

    #[test]
    fn outdent_saturates_at_zero() {
        let mut w = CodeWriter::new();
        w.outdent();
        w.write("x");
        assert_eq!(w.finish(), "x");
    }
}
