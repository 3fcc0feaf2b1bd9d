// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Fatal setup errors for the Vela front end.
//!
//! Only failures that abort before the core runs use this type: a missing
//! or unreadable input file, the wrong file extension, or empty input.
//! Lexical, syntactic, and emission problems are never surfaced here —
//! they are recovered locally and recorded in the
//! [`Diagnostics`](crate::Diagnostics) sink.
//!
//! Errors integrate with [`miette`] for caller-side rendering.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// A fatal error while setting up a compilation unit.
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    /// The input file could not be read.
    #[error("cannot read source file `{path}`")]
    #[diagnostic(code(vela::source::file_read))]
    FileRead {
        /// Path that failed to read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input file does not have the `.vl` extension.
    #[error("source file `{path}` must have the `.vl` extension")]
    #[diagnostic(code(vela::source::wrong_extension))]
    WrongExtension {
        /// Offending path.
        path: Utf8PathBuf,
    },

    /// The input file contains no source text.
    #[error("source file `{path}` is empty")]
    #[diagnostic(code(vela::source::empty))]
    EmptySource {
        /// Offending path.
        path: Utf8PathBuf,
    },
}
