//! Anchor allocation and the persisted anchor map.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::DocumentError,
    sites::{AnchorSite, is_disposable_id, scan_sites},
    slug::Slugifier,
};

/// Default file name of the persisted anchor map.
pub const ANCHOR_MAP_FILE: &str = "__anchors.json";

/// Page → anchor mappings for one assembled document.
///
/// Written once during assembly and read back by later passes. Every anchor in the map is
/// unique within its document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorMap {
    /// Anchor of each page, keyed by bundle-relative page path.
    #[serde(default)]
    pub by_path: BTreeMap<String, String>,
    /// Anchor keyed by page file stem. The first page with a given stem wins.
    #[serde(default)]
    pub by_basename: BTreeMap<String, String>,
}

impl AnchorMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the anchor of a page.
    pub fn insert(&mut self, page: &str, anchor: &str) {
        self.by_path.insert(page.to_string(), anchor.to_string());
        self.by_basename
            .entry(page_stem(page).to_string())
            .or_insert_with(|| anchor.to_string());
    }

    /// Looks up a page by full path.
    pub fn by_path(&self, page: &str) -> Option<&str> {
        self.by_path.get(page).map(String::as_str)
    }

    /// Looks up a page by file stem.
    pub fn by_basename(&self, stem: &str) -> Option<&str> {
        self.by_basename.get(stem).map(String::as_str)
    }

    /// Looks up a page by full path, falling back to its file stem.
    pub fn lookup(&self, page: &str) -> Option<&str> {
        self.by_path(page)
            .or_else(|| self.by_basename(page_stem(page)))
    }

    /// Builds the anchor → page mapping.
    pub fn reverse(&self) -> HashMap<&str, &str> {
        self.by_path
            .iter()
            .map(|(page, anchor)| (anchor.as_str(), page.as_str()))
            .collect()
    }

    /// Number of pages in the map.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Returns true if no page has been recorded.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Writes the map as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| DocumentError::AnchorMap {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| DocumentError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads a map written by [`AnchorMap::save`].
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DocumentError::AnchorMap {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the file stem of the last segment of a `/`-separated path.
pub fn page_stem(page: &str) -> &str {
    let name = page.rsplit('/').next().unwrap_or(page);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// The anchor allocated to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAnchor {
    /// The page's anchor id.
    pub anchor: String,
    /// True when the page has no heading and needs an explicit anchor tag.
    pub headerless: bool,
    /// Text of the first heading, if any.
    pub first_heading: Option<String>,
}

/// Assigns one anchor per page, in page order.
///
/// Every heading and explicit anchor tag of every page passes through the same
/// [`Slugifier`], in the order they appear in the assembled document. The ids handed out here
/// are therefore exactly the ids [`collect_anchors`] finds in the result.
#[derive(Debug, Default)]
pub struct AnchorAllocator {
    /// Slug state shared by the whole document.
    slugifier: Slugifier,
    /// Pages allocated so far.
    map: AnchorMap,
}

impl AnchorAllocator {
    /// Creates an allocator for a new document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the anchor of `page`, whose body is `body`.
    ///
    /// A page with a heading takes its anchor from the first heading. A headerless page takes
    /// it from its file stem; that anchor is claimed before the body's own tags because the
    /// assembler emits its tag ahead of the body.
    pub fn allocate_page(&mut self, page: &str, body: &str) -> PageAnchor {
        let sites = scan_sites(body);
        let headerless = !sites.iter().any(|s| matches!(s, AnchorSite::Heading(_)));

        let mut anchor = headerless.then(|| self.slugifier.slugify(page_stem(page)));
        let mut first_heading = None;

        for site in sites {
            match site {
                AnchorSite::Explicit(tag) => {
                    if !tag.id.is_empty() && !is_disposable_id(&tag.id) {
                        self.slugifier.reserve(&tag.id);
                    }
                }
                AnchorSite::Heading(heading) => {
                    let id = self.slugifier.slugify(&heading.text);
                    if anchor.is_none() {
                        anchor = Some(id);
                        first_heading = Some(heading.text);
                    }
                }
            }
        }

        let anchor = anchor.unwrap_or_default();
        debug!("anchor for {page}: {anchor}");
        self.map.insert(page, &anchor);
        PageAnchor {
            anchor,
            headerless,
            first_heading,
        }
    }

    /// Returns the map built so far.
    pub fn map(&self) -> &AnchorMap {
        &self.map
    }

    /// Consumes the allocator, returning the map.
    pub fn into_map(self) -> AnchorMap {
        self.map
    }
}

/// An anchor present in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAnchor {
    /// The anchor id.
    pub id: String,
    /// Byte offset of the construct defining it.
    pub offset: usize,
    /// True for explicit tags, false for heading-derived ids.
    pub explicit: bool,
}

/// Collects every anchor a document defines, in document order.
///
/// Explicit tags count as written. Headings get slugs under the same duplicate-suffix rule the
/// allocator uses.
pub fn collect_anchors(document: &str) -> Vec<DocumentAnchor> {
    let mut slugifier = Slugifier::new();
    scan_sites(document)
        .into_iter()
        .filter_map(|site| match site {
            AnchorSite::Explicit(tag) => {
                if tag.id.is_empty() {
                    return None;
                }
                slugifier.reserve(&tag.id);
                Some(DocumentAnchor {
                    id: tag.id,
                    offset: tag.range.start,
                    explicit: true,
                })
            }
            AnchorSite::Heading(heading) => Some(DocumentAnchor {
                id: slugifier.slugify(&heading.text),
                offset: heading.range.start,
                explicit: false,
            }),
        })
        .collect()
}
