// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! A compilation unit: one source buffer taken through the front end.

use camino::Utf8Path;

use crate::ast::{Ast, NodeId};
use crate::diagnostics::Diagnostics;
use crate::emit::{self, Target};
use crate::source_analysis::{self, SourceBuffer, SourceError, Token};

/// One source file (or in-memory snippet) and everything the front end
/// derived from it: tokens, the AST, and accumulated diagnostics.
///
/// Construction runs the lexer and the parser; both recover from
/// malformed input, so a `SourceUnit` always carries a complete token
/// stream and a tree. Check [`SourceUnit::has_errors`] before trusting
/// either.
///
/// # Examples
///
/// ```
/// use vela_core::{SourceUnit, Target};
///
/// let mut unit = SourceUnit::from_source("enum Color { Red, Green }");
/// assert!(!unit.has_errors());
/// let cs = unit.emit(Target::CSharp);
/// assert!(cs.starts_with("public enum Color"));
/// ```
#[derive(Debug, Clone)]
pub struct SourceUnit {
    buffer: SourceBuffer,
    tokens: Vec<Token>,
    ast: Ast,
    root: NodeId,
    diagnostics: Diagnostics,
}

impl SourceUnit {
    /// Compiles an in-memory source snippet.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::compile(SourceBuffer::from_source(source))
    }

    /// Loads and compiles a `.vl` source file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read, has the wrong
    /// extension, or is empty. Lexical and syntactic problems are not
    /// errors here; they land in [`SourceUnit::diagnostics`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, SourceError> {
        Ok(Self::compile(SourceBuffer::from_file(path)?))
    }

    fn compile(buffer: SourceBuffer) -> Self {
        let mut diagnostics = Diagnostics::new();
        let tokens = source_analysis::tokenize(&buffer, &mut diagnostics);
        let (ast, root) = source_analysis::parse(tokens.clone(), &mut diagnostics);
        Self {
            buffer,
            tokens,
            ast,
            root,
            diagnostics,
        }
    }

    /// The unit's name: the file path, or `<source>` for snippets.
    #[must_use]
    pub fn name(&self) -> &str {
        self.buffer.name()
    }

    /// The token stream, ending with exactly one end-of-file token.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The parsed tree.
    #[must_use]
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The root module node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// All diagnostics accumulated so far, in insertion order.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Returns true if any stage reported an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Renders the unit in the given target syntax.
    ///
    /// Emission-legality problems (for targets that have them) are
    /// appended to the unit's diagnostics.
    pub fn emit(&mut self, target: Target) -> String {
        emit::emit(&self.ast, self.root, target, &mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_round_trip() {
        let mut unit = SourceUnit::from_source("await x");
        assert!(!unit.has_errors());
        assert_eq!(unit.name(), "<source>");
        assert_eq!(unit.emit(Target::Vela), "await x");
    }

    #[test]
    fn diagnostics_accumulate_across_stages() {
        // One lexical error, one syntactic error, one emission-legality
        // error, all in the same sink.
        let mut unit = SourceUnit::from_source("`\n* 2\nenum S(int, byte) { A }");
        assert_eq!(unit.diagnostics().len(), 2);
        let _ = unit.emit(Target::CSharp);
        assert_eq!(unit.diagnostics().len(), 3);
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let result = SourceUnit::from_file(Utf8Path::new("/nonexistent/x.vl"));
        assert!(result.is_err());
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let result = SourceUnit::from_file(Utf8Path::new("/tmp/file.txt"));
        assert!(matches!(result, Err(SourceError::WrongExtension { .. })));
    }

    #[test]
    fn tokens_and_ast_are_exposed() {
        let unit = SourceUnit::from_source("x = 1");
        assert!(!unit.tokens().is_empty());
        assert!(!unit.ast().is_empty());
        assert!(unit.ast().spans_contain_children(unit.root()));
    }
}
