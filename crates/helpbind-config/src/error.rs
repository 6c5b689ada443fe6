//! Error types for helpbind configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// Failed to compile an exclude glob.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The invalid pattern.
        pattern: String,
        /// Underlying glob error.
        source: globset::Error,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// The `[bundle] family` value names no known family.
    #[error("unknown documentation family '{value}' (expected 'standard' or 'merged-multi-guide')")]
    InvalidFamily {
        /// The value as written.
        value: String,
    },

    /// Online links were requested without the settings needed to build them.
    #[error("online links are enabled but {field} is not set")]
    MissingOnlineSettings {
        /// The missing setting, as `section.key`.
        field: &'static str,
    },

    /// Failed to render the effective configuration.
    #[error("failed to serialize configuration: {source}")]
    SerializeToml {
        /// Underlying TOML serialization error.
        source: ser::Error,
    },
}
