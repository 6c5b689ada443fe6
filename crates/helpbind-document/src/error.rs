//! Error types for document assembly.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when assembling documents or persisting anchor maps.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write file {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An anchor map file could not be encoded or decoded.
    #[error("invalid anchor map {path}: {source}")]
    AnchorMap {
        /// Path to the anchor map.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
