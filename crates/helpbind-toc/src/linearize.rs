//! Pre-order flattening of the TOC tree into page order.
//!
//! Traversal uses an explicit worklist of `(node, depth)` pairs. What happens to a node's
//! children is decided by a single transition, [`NodeOutcome::child_depth`]:
//!
//! | outcome   | node emitted | children visited at |
//! |-----------|--------------|---------------------|
//! | Emitted   | yes          | depth + 1           |
//! | Excluded  | no           | depth + 1           |
//! | Duplicate | no           | depth + 1           |
//! | Missing   | no           | depth               |
//!
//! A missing page does not push its descendants deeper. An excluded page keeps its place in
//! the outline, so its subtree stays where the author nested it.

use std::{collections::HashSet, fmt};

use log::{debug, info, warn};

use crate::{hierarchy::TocNode, source::PageSource};

/// One page of the linearized outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearPage {
    /// Bundle-relative page path with the page-body extension.
    pub relative_path: String,
    /// 1-based nesting depth.
    pub depth: usize,
    /// Title from the TOC entry.
    pub title: String,
    /// Text of the page's first heading, filled in once the body has been read.
    pub first_heading_title: Option<String>,
}

impl LinearPage {
    /// Creates a page entry with no heading information.
    pub fn new(relative_path: impl Into<String>, depth: usize, title: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            depth,
            title: title.into(),
            first_heading_title: None,
        }
    }
}

/// Non-fatal conditions found while linearizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocDiagnostic {
    /// A node's page does not exist; its children were kept at the node's depth.
    MissingTarget {
        /// The node id.
        id: String,
        /// The page path that was looked up (empty when the id is not in the chunk table).
        page: String,
    },
    /// A page appeared a second time in the tree and was not emitted again.
    DuplicatePage {
        /// The repeated page path.
        page: String,
    },
}

impl fmt::Display for TocDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget { id, page } if page.is_empty() => {
                write!(f, "TOC id {id} has no chunk entry")
            }
            Self::MissingTarget { id, page } => {
                write!(f, "target page {page} (TOC id {id}) does not exist")
            }
            Self::DuplicatePage { page } => write!(f, "page {page} already emitted"),
        }
    }
}

/// What happened to a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// The node's page was emitted.
    Emitted,
    /// The node's page matched the exclusion predicate.
    Excluded,
    /// The node's page was already emitted earlier.
    Duplicate,
    /// The node's page does not exist.
    Missing,
}

impl NodeOutcome {
    /// Depth at which the children of a node at `depth` are visited.
    pub fn child_depth(self, depth: usize) -> usize {
        match self {
            Self::Missing => depth,
            Self::Emitted | Self::Excluded | Self::Duplicate => depth + 1,
        }
    }
}

/// Decides whether a page is left out of the outline.
pub trait ExcludePage {
    /// Returns true if `page` (a bundle-relative page path) is excluded.
    fn is_excluded(&self, page: &str) -> bool;
}

impl<F> ExcludePage for F
where
    F: Fn(&str) -> bool,
{
    fn is_excluded(&self, page: &str) -> bool {
        self(page)
    }
}

/// Excludes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusions;

impl ExcludePage for NoExclusions {
    fn is_excluded(&self, _page: &str) -> bool {
        false
    }
}

/// Result of linearizing a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Linearization {
    /// Emitted pages in pre-order.
    pub pages: Vec<LinearPage>,
    /// Skipped nodes worth reporting.
    pub diagnostics: Vec<TocDiagnostic>,
}

impl Linearization {
    /// Pairs each emitted page path with its depth.
    pub fn hierarchy(&self) -> Vec<(&str, usize)> {
        self.pages
            .iter()
            .map(|page| (page.relative_path.as_str(), page.depth))
            .collect()
    }
}

/// Flattens TOC trees into an ordered page list.
pub struct Linearizer<'a> {
    /// Where page existence is checked.
    source: &'a dyn PageSource,
    /// Exclusion predicate.
    exclude: &'a dyn ExcludePage,
    /// Page-body extension without the dot.
    page_extension: String,
}

impl<'a> Linearizer<'a> {
    /// Creates a linearizer.
    pub fn new(source: &'a dyn PageSource, exclude: &'a dyn ExcludePage) -> Self {
        Self {
            source,
            exclude,
            page_extension: "md".to_string(),
        }
    }

    /// Sets the page-body extension (default `md`).
    pub fn with_page_extension(mut self, extension: impl Into<String>) -> Self {
        self.page_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Linearizes the given root nodes, starting at depth 1.
    pub fn linearize(&self, roots: &[TocNode]) -> Linearization {
        let mut result = Linearization::default();
        let mut seen = HashSet::new();
        let mut stack: Vec<(&TocNode, usize)> = roots.iter().rev().map(|n| (n, 1)).collect();

        while let Some((node, depth)) = stack.pop() {
            let outcome = self.visit(node, depth, &mut seen, &mut result);
            let child_depth = outcome.child_depth(depth);
            stack.extend(node.children.iter().rev().map(|child| (child, child_depth)));
        }

        info!(
            "linearized {} pages ({} skipped)",
            result.pages.len(),
            result.diagnostics.len()
        );
        result
    }

    /// Classifies one node and emits it if appropriate.
    fn visit(
        &self,
        node: &TocNode,
        depth: usize,
        seen: &mut HashSet<String>,
        result: &mut Linearization,
    ) -> NodeOutcome {
        let page = page_path_for_target(&node.target_path, &self.page_extension);

        if page.is_empty() || !self.source.exists(&page) {
            let diagnostic = TocDiagnostic::MissingTarget {
                id: node.id.clone(),
                page,
            };
            warn!("{diagnostic}, skipping");
            result.diagnostics.push(diagnostic);
            return NodeOutcome::Missing;
        }

        if self.exclude.is_excluded(&page) {
            debug!("excluded {page}");
            return NodeOutcome::Excluded;
        }

        if !seen.insert(page.clone()) {
            let diagnostic = TocDiagnostic::DuplicatePage { page };
            warn!("{diagnostic}, skipping");
            result.diagnostics.push(diagnostic);
            return NodeOutcome::Duplicate;
        }

        result
            .pages
            .push(LinearPage::new(page, depth, node.title.clone()));
        NodeOutcome::Emitted
    }
}

/// Maps a TOC target path to a page-body path.
///
/// Strips a leading `/` and any fragment, and swaps the file extension for `extension`:
/// `/Content/A.htm#x` becomes `Content/A.md`.
pub fn page_path_for_target(target: &str, extension: &str) -> String {
    let without_fragment = target.split_once('#').map_or(target, |(path, _)| path);
    let trimmed = without_fragment.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }

    let name_start = trimmed.rfind('/').map_or(0, |i| i + 1);
    let stem_end = trimmed[name_start..]
        .rfind('.')
        .filter(|&dot| dot > 0)
        .map_or(trimmed.len(), |dot| name_start + dot);
    format!("{}.{extension}", &trimmed[..stem_end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryPageSource;

    fn node(id: &str, page: &str) -> TocNode {
        TocNode::new(id, id.to_uppercase(), format!("/{page}.htm"))
    }

    fn source(pages: &[&str]) -> MemoryPageSource {
        pages.iter().fold(MemoryPageSource::new(), |source, page| {
            source.with_page(format!("{page}.md"), "")
        })
    }

    fn order(result: &Linearization) -> Vec<(&str, usize)> {
        result.hierarchy()
    }

    #[test]
    fn child_depth_transition() {
        assert_eq!(NodeOutcome::Emitted.child_depth(2), 3);
        assert_eq!(NodeOutcome::Excluded.child_depth(2), 3);
        assert_eq!(NodeOutcome::Duplicate.child_depth(2), 3);
        assert_eq!(NodeOutcome::Missing.child_depth(2), 2);
    }

    #[test]
    fn preorder_with_sibling_order() {
        let tree = vec![
            node("a", "a").with_children(vec![
                node("b", "b").with_children(vec![node("c", "c")]),
                node("d", "d"),
            ]),
            node("e", "e"),
        ];
        let src = source(&["a", "b", "c", "d", "e"]);
        let result = Linearizer::new(&src, &NoExclusions).linearize(&tree);
        assert_eq!(
            order(&result),
            vec![("a.md", 1), ("b.md", 2), ("c.md", 3), ("d.md", 2), ("e.md", 1)]
        );
        assert_eq!(result.pages[0].title, "A");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn excluded_node_keeps_children_at_next_depth() {
        let tree = vec![node("root", "root").with_children(vec![
            node("nav", "_FT_SideNav_Startup").with_children(vec![node("x", "x"), node("y", "y")]),
        ])];
        let src = source(&["root", "_FT_SideNav_Startup", "x", "y"]);
        let exclude = |page: &str| page.starts_with("_FT_SideNav");
        let result = Linearizer::new(&src, &exclude).linearize(&tree);
        assert_eq!(
            order(&result),
            vec![("root.md", 1), ("x.md", 3), ("y.md", 3)]
        );
    }

    #[test]
    fn missing_node_keeps_children_at_same_depth() {
        let tree = vec![node("gone", "gone").with_children(vec![node("kid", "kid")])];
        let src = source(&["kid"]);
        let result = Linearizer::new(&src, &NoExclusions).linearize(&tree);
        assert_eq!(order(&result), vec![("kid.md", 1)]);
        assert_eq!(
            result.diagnostics,
            vec![TocDiagnostic::MissingTarget {
                id: "gone".into(),
                page: "gone.md".into()
            }]
        );
    }

    #[test]
    fn unknown_id_is_missing() {
        let tree = vec![TocNode::new("7", "", "")];
        let src = source(&[]);
        let result = Linearizer::new(&src, &NoExclusions).linearize(&tree);
        assert!(result.pages.is_empty());
        assert_eq!(
            result.diagnostics[0].to_string(),
            "TOC id 7 has no chunk entry"
        );
    }

    #[test]
    fn duplicates_emitted_once() {
        let tree = vec![
            node("a", "a"),
            node("a2", "a").with_children(vec![node("b", "b")]),
        ];
        let src = source(&["a", "b"]);
        let result = Linearizer::new(&src, &NoExclusions).linearize(&tree);
        assert_eq!(order(&result), vec![("a.md", 1), ("b.md", 2)]);
        assert_eq!(
            result.diagnostics,
            vec![TocDiagnostic::DuplicatePage {
                page: "a.md".into()
            }]
        );
    }

    #[test]
    fn custom_page_extension() {
        let tree = vec![node("a", "a")];
        let src = MemoryPageSource::new().with_page("a.txt", "");
        let result = Linearizer::new(&src, &NoExclusions)
            .with_page_extension(".txt")
            .linearize(&tree);
        assert_eq!(order(&result), vec![("a.txt", 1)]);
    }

    #[test]
    fn target_to_page_path() {
        assert_eq!(page_path_for_target("/Content/A.htm", "md"), "Content/A.md");
        assert_eq!(page_path_for_target("Content/A.htm#sec", "md"), "Content/A.md");
        assert_eq!(page_path_for_target("Content/v1.2/readme", "md"), "Content/v1.2/readme.md");
        assert_eq!(page_path_for_target("Content/.hidden", "md"), "Content/.hidden.md");
        assert_eq!(page_path_for_target("", "md"), "");
        assert_eq!(page_path_for_target("/", "md"), "");
    }
}
