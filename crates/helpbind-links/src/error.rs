//! Error types for link passes.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when rewriting documents or writing reports.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Failed to read a document.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write a document or report.
    #[error("failed to write file {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to copy an image into the assets folder.
    #[error("failed to copy asset {from} to {to}: {source}")]
    CopyAsset {
        /// Image being copied.
        from: PathBuf,
        /// Destination in the assets folder.
        to: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}
