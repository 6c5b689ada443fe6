//! Error types for TOC definition parsing.
//!
//! The lenient grammar reports position-carrying [`LexError`]s and [`ParseError`]s. Loading a
//! definition file folds those into [`TocError`], which callers log before skipping the
//! document.

use std::{error::Error, fmt, io, path::PathBuf};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Formats the error with the offending line and a caret under the column.
    pub fn format_with_context(&self, input: &str) -> String {
        format_at(&self.message, self.position, input)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.position, self.message)
    }
}

impl Error for LexError {}

/// Parse error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte position of the token where the error occurred (if applicable).
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Formats the error with the offending line and a caret under the column.
    pub fn format_with_context(&self, input: &str) -> String {
        match self.position {
            Some(pos) => format_at(&self.message, pos, input),
            None => format!("syntax error: {}", self.message),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pos) = self.position {
            write!(f, "at byte {}: {}", pos, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            position: Some(err.position),
        }
    }
}

/// Renders `message` with the line containing `position` and a caret under it.
fn format_at(message: &str, position: usize, input: &str) -> String {
    let clamped = position.min(input.len());
    let line_start = input[..clamped].rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[clamped..]
        .find('\n')
        .map_or(input.len(), |i| clamped + i);
    let line = &input[line_start..line_end];
    let column = input[line_start..clamped].chars().count();

    let mut result = String::new();
    result.push_str(&format!("syntax error: {message}\n"));
    result.push_str(&format!("  {line}\n"));
    result.push_str(&format!("  {}^", " ".repeat(column)));
    result
}

/// Errors that can occur when loading TOC definition documents.
#[derive(Debug, Error)]
pub enum TocError {
    /// Failed to read a definition file.
    #[error("failed to read TOC file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A definition document could not be parsed by any tolerance stage.
    #[error("unparsable TOC definition {path}: {source}")]
    Unparsable {
        /// Path to the document.
        path: PathBuf,
        /// The error from the lenient parser (the first stage).
        source: ParseError,
    },

    /// A definition document parsed, but does not have the expected shape.
    #[error("unexpected TOC structure in {path}: {message}")]
    Structure {
        /// Path to the document.
        path: PathBuf,
        /// What was expected.
        message: String,
    },

    /// A bundle has no usable hierarchy/chunk pair.
    #[error("no TOC definitions found under {path}")]
    MissingHierarchy {
        /// The TOC directory that was searched.
        path: PathBuf,
    },

    /// Failed to write an outline file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
