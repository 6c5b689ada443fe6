//! Errors raised while building a bundle.

use std::{io, path::PathBuf};

use helpbind_config::ConfigError;
use helpbind_document::DocumentError;
use helpbind_links::LinkError;
use helpbind_toc::TocError;
use thiserror::Error;

/// Errors that stop a bundle build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration could not be loaded or applied.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The TOC could not be loaded or the outline written.
    #[error(transparent)]
    Toc(#[from] TocError),

    /// The anchor map could not be written.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A document, report or image could not be written.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The TOC named no page that exists.
    #[error("no pages to assemble in {bundle}")]
    NoPages {
        /// Bundle directory.
        bundle: PathBuf,
    },

    /// The external-links variant was requested without an online site.
    #[error("the external-links variant needs online.base_url or --base-url")]
    ExternalWithoutOnline,
}
