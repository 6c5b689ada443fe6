//! Persisted outline files.
//!
//! `__toc.txt` lists one page path per line. `__hierarchy.txt` lists one page per line as
//! `#`×depth, a space, and the path. Later passes (heading-level normalization, re-assembly)
//! read the hierarchy file back instead of re-parsing the TOC.

use std::{fs, path::Path};

use log::warn;

use crate::{error::TocError, linearize::LinearPage};

/// File name of the flat page list.
pub const TOC_FILE: &str = "__toc.txt";

/// File name of the depth-annotated page list.
pub const HIERARCHY_FILE: &str = "__hierarchy.txt";

/// Renders the flat page list.
pub fn render_toc(pages: &[LinearPage]) -> String {
    pages
        .iter()
        .map(|page| format!("{}\n", page.relative_path))
        .collect()
}

/// Renders the depth-annotated page list.
pub fn render_hierarchy(pages: &[LinearPage]) -> String {
    pages
        .iter()
        .map(|page| format!("{} {}\n", "#".repeat(page.depth), page.relative_path))
        .collect()
}

/// Parses a depth-annotated page list. Malformed lines are logged and skipped.
pub fn parse_hierarchy(text: &str) -> Vec<LinearPage> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let depth = line.chars().take_while(|&c| c == '#').count();
            let path = line[depth..].trim();
            if depth == 0 || path.is_empty() || !line[depth..].starts_with(char::is_whitespace) {
                warn!("ignoring malformed hierarchy line: {line}");
                return None;
            }
            Some(LinearPage::new(path, depth, ""))
        })
        .collect()
}

/// Writes `__toc.txt` and `__hierarchy.txt` into `dir`.
pub fn write_outline(dir: &Path, pages: &[LinearPage]) -> Result<(), TocError> {
    for (name, contents) in [
        (TOC_FILE, render_toc(pages)),
        (HIERARCHY_FILE, render_hierarchy(pages)),
    ] {
        let path = dir.join(name);
        fs::write(&path, contents).map_err(|source| TocError::WriteFile { path, source })?;
    }
    Ok(())
}

/// Reads `__hierarchy.txt` from `dir`.
pub fn read_hierarchy(dir: &Path) -> Result<Vec<LinearPage>, TocError> {
    let path = dir.join(HIERARCHY_FILE);
    let text = fs::read_to_string(&path).map_err(|source| TocError::ReadFile { path, source })?;
    Ok(parse_hierarchy(&text))
}
