//! Page boundary markers.
//!
//! Each page in an assembled document starts with `<!-- BEGIN_FILE: {path} -->` on its own
//! line. Later passes split the document at these markers to know which page a link was
//! written in.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;

/// Matches a boundary marker and captures the page path.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*BEGIN_FILE:\s*(.*?)\s*-->").expect("boundary marker pattern is valid")
});

/// Formats the boundary marker of `page`.
pub fn begin_marker(page: &str) -> String {
    format!("<!-- BEGIN_FILE: {page} -->")
}

/// A stretch of an assembled document belonging to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// The page path, or `None` for text before the first marker.
    pub page: Option<&'a str>,
    /// Byte range of the block, starting at its marker.
    pub range: Range<usize>,
}

impl Block<'_> {
    /// Directory of the block's page, with a trailing `/`, or empty at the bundle root.
    pub fn directory(&self) -> &str {
        self.page
            .and_then(|page| page.rfind('/').map(|slash| &page[..=slash]))
            .unwrap_or("")
    }
}

/// Finds every boundary marker, returning its byte range and page path.
pub fn find_markers(document: &str) -> Vec<(Range<usize>, &str)> {
    MARKER_RE
        .captures_iter(document)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.range(), caps.get(1)?.as_str()))
        })
        .collect()
}

/// Splits a document into page blocks.
///
/// Text before the first marker forms a block with no page; it is omitted when empty.
pub fn split_blocks(document: &str) -> Vec<Block<'_>> {
    let markers = find_markers(document);
    let mut blocks = Vec::with_capacity(markers.len() + 1);

    let first_start = markers.first().map_or(document.len(), |(range, _)| range.start);
    if first_start > 0 {
        blocks.push(Block {
            page: None,
            range: 0..first_start,
        });
    }

    for (i, (range, page)) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map_or(document.len(), |(next, _)| next.start);
        blocks.push(Block {
            page: Some(*page),
            range: range.start..end,
        });
    }

    blocks
}

/// Returns the index of the block containing byte `offset`.
pub fn block_index_at(blocks: &[Block<'_>], offset: usize) -> Option<usize> {
    blocks
        .iter()
        .position(|block| block.range.contains(&offset))
}
