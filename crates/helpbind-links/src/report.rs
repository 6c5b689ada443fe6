//! Document files and line-oriented diagnostic reports.

use std::{fmt::Display, fs, path::Path};

use crate::error::LinkError;

/// Default file name of the unresolved-links report.
pub const UNRESOLVED_REPORT: &str = "unresolved_links.txt";

/// Default file name of the missing-anchors report.
pub const MISSING_REPORT: &str = "missing_anchors.txt";

/// Reads a document.
pub fn read_document(path: &Path) -> Result<String, LinkError> {
    fs::read_to_string(path).map_err(|source| LinkError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document.
pub fn write_document(path: &Path, text: &str) -> Result<(), LinkError> {
    fs::write(path, text).map_err(|source| LinkError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders one entry per line. An empty list renders as an empty string.
pub fn render_report<T: Display>(entries: &[T]) -> String {
    entries.iter().map(|entry| format!("{entry}\n")).collect()
}

/// Writes a report, creating the file even when there is nothing to report.
pub fn write_report<T: Display>(path: &Path, entries: &[T]) -> Result<(), LinkError> {
    write_document(path, &render_report(entries))
}
