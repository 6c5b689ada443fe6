//! Concatenating page bodies into one document.

use std::path::PathBuf;

use helpbind_toc::{LinearPage, PageSource};
use log::{info, warn};

use crate::{
    anchors::{AnchorAllocator, AnchorMap},
    error::DocumentError,
    levels::normalize_heading_levels,
    marker::begin_marker,
    sites::extract_headings,
};

/// Link text of the "view online" decoration.
pub const ONLINE_GLYPH: &str = "↗";

/// Supplies the published URL of a page.
pub trait ViewOnline {
    /// Returns the online URL of `page` (a bundle-relative page path), if it has one.
    fn page_url(&self, page: &str) -> Option<String>;
}

/// Never decorates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOnline;

impl ViewOnline for NoOnline {
    fn page_url(&self, _page: &str) -> Option<String> {
        None
    }
}

/// Formats the explicit anchor tag for `id`.
pub fn anchor_tag(id: &str) -> String {
    format!("<a id=\"{id}\"></a>")
}

/// Formats the "view online" decoration appended to a heading.
pub fn online_decoration(url: &str) -> String {
    format!(" [{ONLINE_GLYPH}]({url})")
}

/// The result of assembling a bundle.
#[derive(Debug, Default)]
pub struct Assembly {
    /// The assembled document.
    pub document: String,
    /// Page anchors.
    pub anchors: AnchorMap,
    /// The assembled pages, with their first heading filled in.
    pub pages: Vec<LinearPage>,
    /// Pages that could not be read.
    pub skipped: Vec<DocumentError>,
}

/// Builds assembled documents from linearized pages.
pub struct Assembler<'a> {
    /// Where page bodies come from.
    source: &'a dyn PageSource,
    /// URL supplier for heading decoration.
    online: &'a dyn ViewOnline,
    /// Whether heading levels are aligned to page depth.
    normalize_levels: bool,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler with heading-level normalization on and decoration off.
    pub fn new(source: &'a dyn PageSource) -> Self {
        Self {
            source,
            online: &NoOnline,
            normalize_levels: true,
        }
    }

    /// Decorates each page's first heading with a link to its online copy.
    pub fn with_online(mut self, online: &'a dyn ViewOnline) -> Self {
        self.online = online;
        self
    }

    /// Enables or disables heading-level normalization.
    pub fn with_level_normalization(mut self, enabled: bool) -> Self {
        self.normalize_levels = enabled;
        self
    }

    /// Assembles `pages` in order.
    ///
    /// Each page contributes its boundary marker, an explicit anchor tag when it has no
    /// heading, its body, and a blank line. A page that cannot be read is logged and left out.
    pub fn assemble(&self, pages: &[LinearPage]) -> Assembly {
        let mut allocator = AnchorAllocator::new();
        let mut assembly = Assembly::default();

        for page in pages {
            let path = &page.relative_path;
            let body = match self.source.read(path) {
                Ok(body) => body,
                Err(source) => {
                    let err = DocumentError::ReadFile {
                        path: PathBuf::from(path),
                        source,
                    };
                    warn!("{err}, skipping page");
                    assembly.skipped.push(err);
                    continue;
                }
            };

            let body = if self.normalize_levels {
                normalize_heading_levels(&body, page.depth)
            } else {
                body
            };

            let anchor = allocator.allocate_page(path, &body);

            let body = match self.online.page_url(path) {
                Some(url) if !anchor.headerless => decorate_first_heading(&body, &url),
                _ => body,
            };

            let doc = &mut assembly.document;
            doc.push_str(&begin_marker(path));
            doc.push('\n');
            if anchor.headerless {
                doc.push_str(&anchor_tag(&anchor.anchor));
                doc.push_str("\n\n");
            }
            doc.push_str(&body);
            if !body.ends_with('\n') {
                doc.push('\n');
            }
            doc.push('\n');

            assembly.pages.push(LinearPage {
                first_heading_title: anchor.first_heading,
                ..page.clone()
            });
        }

        info!(
            "assembled {} pages ({} skipped)",
            assembly.pages.len(),
            assembly.skipped.len()
        );
        assembly.anchors = allocator.into_map();
        assembly
    }
}

/// Appends the online decoration to the first heading's line.
///
/// A closing `#` sequence on an ATX heading is removed so the decoration stays part of the
/// heading text. Bodies without headings, or already decorated, are returned unchanged.
pub fn decorate_first_heading(body: &str, url: &str) -> String {
    let Some(heading) = extract_headings(body).into_iter().next() else {
        return body.to_string();
    };

    let start = heading.range.start;
    let line_end = body[start..].find('\n').map_or(body.len(), |i| start + i);
    let line = &body[start..line_end];
    if line.contains(&format!("[{ONLINE_GLYPH}](")) {
        return body.to_string();
    }

    let mut kept = line.trim_end();
    if heading.atx {
        let without_hashes = kept.trim_end_matches('#');
        if without_hashes.len() < kept.len() && without_hashes.ends_with([' ', '\t']) {
            kept = without_hashes.trim_end();
        }
    }

    let mut result = String::with_capacity(body.len() + url.len() + 8);
    result.push_str(&body[..start]);
    result.push_str(kept);
    result.push_str(&online_decoration(url));
    result.push_str(&body[line_end..]);
    result
}

#[cfg(test)]
mod tests {
    use helpbind_toc::MemoryPageSource;

    use super::*;

    struct Site;

    impl ViewOnline for Site {
        fn page_url(&self, page: &str) -> Option<String> {
            Some(format!("https://docs.example.com/{page}"))
        }
    }

    #[test]
    fn decorates_plain_heading() {
        assert_eq!(
            decorate_first_heading("# Title\n\nText\n\n# Other\n", "u"),
            "# Title [↗](u)\n\nText\n\n# Other\n"
        );
    }

    #[test]
    fn decoration_drops_closing_hashes() {
        assert_eq!(decorate_first_heading("## Title ##\n", "u"), "## Title [↗](u)\n");
        assert_eq!(decorate_first_heading("# C#\n", "u"), "# C# [↗](u)\n");
    }

    #[test]
    fn decoration_is_idempotent() {
        let once = decorate_first_heading("# Title\n", "u");
        assert_eq!(decorate_first_heading(&once, "u"), once);
    }

    #[test]
    fn decoration_without_heading() {
        assert_eq!(decorate_first_heading("text\n", "u"), "text\n");
    }

    #[test]
    fn assembles_with_markers_and_anchors() {
        let source = MemoryPageSource::new()
            .with_page("Content/a.md", "# Overview\n\nIntro.")
            .with_page("Content/b.md", "No heading here.\n")
            .with_page("Content/c.md", "# Overview\n");
        let pages = vec![
            LinearPage::new("Content/a.md", 1, "A"),
            LinearPage::new("Content/b.md", 2, "B"),
            LinearPage::new("Content/c.md", 2, "C"),
        ];

        let assembly = Assembler::new(&source).assemble(&pages);
        assert_eq!(
            assembly.document,
            "<!-- BEGIN_FILE: Content/a.md -->\n# Overview\n\nIntro.\n\n\
             <!-- BEGIN_FILE: Content/b.md -->\n<a id=\"b\"></a>\n\nNo heading here.\n\n\
             <!-- BEGIN_FILE: Content/c.md -->\n## Overview\n\n"
        );
        assert_eq!(assembly.anchors.by_path("Content/a.md"), Some("overview"));
        assert_eq!(assembly.anchors.by_path("Content/b.md"), Some("b"));
        assert_eq!(assembly.anchors.by_path("Content/c.md"), Some("overview-1"));
        assert_eq!(
            assembly.pages[0].first_heading_title.as_deref(),
            Some("Overview")
        );
        assert_eq!(assembly.pages[1].first_heading_title, None);
    }

    #[test]
    fn unreadable_page_is_skipped() {
        let source = MemoryPageSource::new().with_page("a.md", "# A\n");
        let pages = vec![LinearPage::new("gone.md", 1, ""), LinearPage::new("a.md", 1, "")];
        let assembly = Assembler::new(&source).assemble(&pages);
        assert_eq!(assembly.skipped.len(), 1);
        assert_eq!(assembly.pages.len(), 1);
        assert!(assembly.anchors.by_path("gone.md").is_none());
    }

    #[test]
    fn online_decoration_applied() {
        let source = MemoryPageSource::new()
            .with_page("a.md", "# A\n")
            .with_page("b.md", "text\n");
        let pages = vec![LinearPage::new("a.md", 1, ""), LinearPage::new("b.md", 1, "")];
        let assembly = Assembler::new(&source).with_online(&Site).assemble(&pages);
        assert!(
            assembly
                .document
                .contains("# A [↗](https://docs.example.com/a.md)\n")
        );
        assert!(!assembly.document.contains("docs.example.com/b.md"));
    }

    #[test]
    fn normalization_can_be_disabled() {
        let source = MemoryPageSource::new().with_page("a.md", "# A\n");
        let pages = vec![LinearPage::new("a.md", 3, "")];
        let doc = Assembler::new(&source)
            .with_level_normalization(false)
            .assemble(&pages)
            .document;
        assert!(doc.contains("\n# A\n"));
    }
}
