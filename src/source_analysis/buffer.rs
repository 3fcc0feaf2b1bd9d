// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Source text container.
//!
//! [`SourceBuffer`] holds source code as an ordered sequence of lines.
//! At load time each line is appended with a synthetic end-of-line marker
//! and the final line additionally receives an end-of-stream marker, so
//! the lexer never has to special-case running off the end of a line.
//! The buffer is immutable after construction.

use camino::Utf8Path;
use ecow::EcoString;

use super::error::SourceError;

/// Marker appended to every source line.
pub(crate) const END_OF_LINE: char = '\n';

/// Marker appended after the last line's end-of-line marker.
pub(crate) const END_OF_STREAM: char = '\0';

/// Required extension for Vela source files.
const SOURCE_EXTENSION: &str = "vl";

/// Source code for one compilation unit, split into marked lines.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    /// Display name of the unit (file name, or a placeholder for strings).
    name: EcoString,
    /// Source lines, each ending in [`END_OF_LINE`]; the last line
    /// additionally ends in [`END_OF_STREAM`].
    lines: Vec<String>,
}

impl SourceBuffer {
    /// Creates a buffer from in-memory source text.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::from_lines("<source>", source.split('\n').map(str::to_owned))
    }

    /// Creates a buffer by reading a `.vl` source file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file does not exist, has the wrong
    /// extension, or is empty. These are the only fatal conditions in the
    /// front end; everything later is a recoverable diagnostic.
    pub fn from_file(path: &Utf8Path) -> Result<Self, SourceError> {
        if path.extension() != Some(SOURCE_EXTENSION) {
            return Err(SourceError::WrongExtension {
                path: path.to_owned(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::FileRead {
            path: path.to_owned(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(SourceError::EmptySource {
                path: path.to_owned(),
            });
        }
        let name = path.file_name().unwrap_or(path.as_str());
        Ok(Self::from_lines(name, text.split('\n').map(str::to_owned)))
    }

    fn from_lines(name: &str, lines: impl Iterator<Item = String>) -> Self {
        let mut lines: Vec<String> = lines
            .map(|mut line| {
                // Normalize away carriage returns from `\r\n` sources.
                if line.ends_with('\r') {
                    line.pop();
                }
                line.push(END_OF_LINE);
                line
            })
            .collect();
        if let Some(last) = lines.last_mut() {
            last.push(END_OF_STREAM);
        } else {
            lines.push(format!("{END_OF_LINE}{END_OF_STREAM}"));
        }
        Self {
            name: name.into(),
            lines,
        }
    }

    /// Returns the display name of this unit.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns a line including its synthetic markers.
    #[must_use]
    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }
}
