//! Rewriting link targets in an assembled document.
//!
//! Every link is tried in up to three layers:
//!
//! 1. **Block context**: the link's page (from the nearest boundary marker above it) fixes the
//!    directory relative targets are joined against. A hit in the anchor map becomes
//!    `#anchor`; a reference leaving the bundle becomes an online URL.
//! 2. **Fragments**: a `#fragment` that names no live anchor is stripped of legacy noise,
//!    re-slugified and matched against the nearest anchor sharing that slug.
//! 3. **Global fallback**: links layer 1 could not place are retried with `../` removed
//!    step by step, with and without a `Content/` prefix, then by file stem alone.
//!
//! Whatever is still unplaced is left as written and reported.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    ops::Range,
    sync::LazyLock,
};

use helpbind_document::{
    AnchorMap, Block, DocumentAnchor, block_index_at, collect_anchors, is_disposable_id,
    page_stem, slugify, split_blocks,
};
use log::{debug, info, warn};
use regex::Regex;

use crate::{
    family::DocFamily,
    normalize::{normalize_target_path, strip_rel_and_ext},
    scan::{decode_target, is_external, line_at, scan_links, split_fragment},
    url::OnlineLinker,
};

/// Legacy prefixes in front of fragment ids.
static LEGACY_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^_*(?:(?:toc|ref|anchor|bkmk|mc)[-_])?").expect("legacy prefix pattern is valid")
});

/// Trailing numeric counter on a fragment id.
static COUNTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]\d+$").expect("counter pattern is valid"));

/// Extensions of published pages that may appear in links.
const SOURCE_EXTENSIONS: [&str; 2] = ["htm", "html"];

/// What link targets become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Pages of the bundle become `#anchor` references.
    #[default]
    InDocument,
    /// Every page reference, local or not, becomes an online URL.
    External,
}

/// A link left as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    /// Page the link was written in, if it follows a boundary marker.
    pub page: Option<String>,
    /// The target as written.
    pub target: String,
    /// Line in the document.
    pub line: usize,
}

impl fmt::Display for UnresolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page.as_deref().unwrap_or("-");
        write!(f, "{page}:{}: {}", self.line, self.target)
    }
}

/// The rewritten document.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Document with resolved targets.
    pub document: String,
    /// Number of targets changed.
    pub rewritten: usize,
    /// Links left as written.
    pub unresolved: Vec<UnresolvedLink>,
}

/// Joins `target` onto `dir` and folds `.`/`..` segments.
///
/// Returns `None` when the target climbs above the bundle root.
pub fn join_relative(dir: &str, target: &str) -> Option<String> {
    let target = target.replace('\\', "/");
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("{dir}{target}")
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => segments.push(segment),
        }
    }
    Some(segments.join("/"))
}

/// Swaps the extension of the last path segment for `extension`.
fn with_extension(path: &str, extension: &str) -> String {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let stem_end = match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => name_start + dot,
        _ => path.len(),
    };
    format!("{}.{extension}", &path[..stem_end])
}

/// Returns the extension of the last path segment.
fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => Some(&name[dot + 1..]),
        _ => None,
    }
}

/// Reduces a legacy fragment id to the slug it was derived from.
///
/// `_Toc_Install_Guide_2` becomes `install-guide`.
pub fn canonical_fragment(fragment: &str) -> String {
    let without_prefix = LEGACY_PREFIX_RE.replace(fragment, "");
    let without_counter = COUNTER_RE.replace(&without_prefix, "");
    slugify(&without_counter)
}

/// Returns true if `id` is `base` or `base-N`.
fn shares_slug(id: &str, base: &str) -> bool {
    id.strip_prefix(base).is_some_and(|rest| {
        rest.is_empty()
            || rest
                .strip_prefix('-')
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Distance from `offset` to `range`; zero inside it.
fn distance(range: &Range<usize>, offset: usize) -> usize {
    if offset < range.start {
        range.start - offset
    } else if offset >= range.end {
        offset + 1 - range.end
    } else {
        0
    }
}

/// Everything known about the document while resolving one link.
struct Scope<'d> {
    /// Page blocks of the document.
    blocks: &'d [Block<'d>],
    /// Anchors present in the document, in document order.
    located: &'d [DocumentAnchor],
    /// Ids of `located` that survive the final dedupe pass.
    live: &'d HashSet<&'d str>,
    /// Anchor → page.
    reverse: &'d HashMap<&'d str, &'d str>,
    /// Block holding the link.
    block: Option<usize>,
    /// Offset of the link.
    offset: usize,
}

impl Scope<'_> {
    /// Page the link was written in.
    fn page(&self) -> Option<&str> {
        self.block.and_then(|i| self.blocks[i].page)
    }

    /// Finds the anchor sharing `base` closest to block `near`.
    ///
    /// Candidates in that block win over all others; ties go to the one closest to the link.
    fn nearest_anchor(&self, base: &str, near: Option<usize>) -> Option<&str> {
        let block_range = near.map(|i| self.blocks[i].range.clone());
        self.located
            .iter()
            .filter(|anchor| !is_disposable_id(&anchor.id) && shares_slug(&anchor.id, base))
            .min_by_key(|anchor| {
                let block_distance = block_range
                    .as_ref()
                    .map_or(0, |range| distance(range, anchor.offset));
                (block_distance, anchor.offset.abs_diff(self.offset))
            })
            .map(|anchor| anchor.id.as_str())
    }

    /// The kept anchor a disposable tag labels: the next anchor after it in its block.
    ///
    /// Word and MadCap bookmarks sit right before, or inside, the heading they mark.
    fn labelled_by(&self, id: &str) -> Option<&str> {
        if !is_disposable_id(id) {
            return None;
        }
        let index = self.located.iter().position(|a| a.id == id)?;
        let block = block_index_at(self.blocks, self.located[index].offset);
        self.located[index + 1..]
            .iter()
            .filter(|a| !is_disposable_id(&a.id))
            .find(|a| block_index_at(self.blocks, a.offset) == block)
            .map(|a| a.id.as_str())
    }

    /// Matches a fragment against the live anchors near block `near`.
    ///
    /// A fragment naming no live anchor is canonicalized and matched by proximity, so a
    /// same-block anchor always beats an equal slug elsewhere.
    fn match_fragment(&self, fragment: &str, near: Option<usize>) -> Option<String> {
        if self.live.contains(fragment) {
            return Some(fragment.to_string());
        }
        if let Some(id) = self.labelled_by(fragment) {
            debug!("bookmark #{fragment} replaced by #{id}");
            return Some(id.to_string());
        }
        let base = canonical_fragment(fragment);
        let found = self.nearest_anchor(&base, near).map(str::to_string);
        if let Some(id) = &found {
            debug!("fragment #{fragment} canonicalized to #{id}");
        }
        found
    }

    /// Index of the block of `page`.
    fn block_of(&self, page: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.page == Some(page))
    }

    /// Page whose block holds anchor `id`.
    fn page_holding(&self, id: &str) -> Option<&str> {
        if let Some(page) = self.reverse.get(id).copied() {
            return Some(page);
        }
        let anchor = self.located.iter().find(|a| a.id == id)?;
        let index = block_index_at(self.blocks, anchor.offset)?;
        self.blocks[index].page
    }
}

/// Rewrites the links of an assembled document.
pub struct LinkResolver<'a> {
    /// Page anchors of the document.
    anchors: &'a AnchorMap,
    /// Online URL builder for references leaving the bundle.
    online: Option<&'a OnlineLinker<'a>>,
    /// What local references become.
    mode: ResolveMode,
    /// Extension of assembled page paths, without the dot.
    page_extension: String,
}

impl<'a> LinkResolver<'a> {
    /// Creates an in-document resolver without online fallback.
    pub fn new(anchors: &'a AnchorMap) -> Self {
        Self {
            anchors,
            online: None,
            mode: ResolveMode::InDocument,
            page_extension: "md".to_string(),
        }
    }

    /// Enables online URLs for references that leave the bundle.
    pub fn with_online(mut self, online: &'a OnlineLinker<'a>) -> Self {
        self.online = Some(online);
        self
    }

    /// Sets the resolution mode.
    pub fn with_mode(mut self, mode: ResolveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the extension of page paths in the anchor map.
    pub fn with_page_extension(mut self, extension: &str) -> Self {
        self.page_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Returns true for targets that name a page.
    fn is_page_path(&self, path: &str) -> bool {
        extension_of(path).is_some_and(|ext| {
            ext.eq_ignore_ascii_case(&self.page_extension)
                || SOURCE_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s))
        })
    }

    /// Family used to normalize targets.
    fn family(&self) -> DocFamily {
        self.online.map_or(DocFamily::Standard, |o| o.site().family)
    }

    /// Rewrites every link in `document`.
    pub fn resolve(&self, document: &str) -> Resolution {
        let blocks = split_blocks(document);
        let located = collect_anchors(document);
        let live: HashSet<&str> = located
            .iter()
            .map(|a| a.id.as_str())
            .filter(|id| !is_disposable_id(id))
            .collect();
        let reverse = self.anchors.reverse();

        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut unresolved = Vec::new();

        for link in scan_links(document) {
            if is_external(&link.target) {
                continue;
            }
            let target = decode_target(&link.target);
            let (path, fragment) = split_fragment(&target);
            if !path.is_empty() && !self.is_page_path(path) {
                continue;
            }

            let scope = Scope {
                blocks: &blocks,
                located: &located,
                live: &live,
                reverse: &reverse,
                block: block_index_at(&blocks, link.range.start),
                offset: link.range.start,
            };

            let replacement = if path.is_empty() {
                self.resolve_fragment(fragment.unwrap_or_default(), &scope)
            } else {
                self.resolve_in_block(path, fragment, &scope)
                    .or_else(|| self.global_fallback(path, fragment, &scope))
            };

            match replacement {
                Some(new_target) if new_target != link.target => {
                    debug!("{} -> {new_target}", link.target);
                    edits.push((link.range, new_target));
                }
                Some(_) => {}
                None => {
                    let unplaced = UnresolvedLink {
                        page: scope.page().map(str::to_string),
                        target: link.target,
                        line: line_at(document, link.range.start),
                    };
                    warn!("unresolved link {unplaced}");
                    unresolved.push(unplaced);
                }
            }
        }

        let rewritten = edits.len();
        let mut out = document.to_string();
        for (range, text) in edits.into_iter().rev() {
            out.replace_range(range, &text);
        }
        info!(
            "rewrote {rewritten} links ({} unresolved)",
            unresolved.len()
        );
        Resolution {
            document: out,
            rewritten,
            unresolved,
        }
    }

    /// Resolves a bare `#fragment`.
    fn resolve_fragment(&self, fragment: &str, scope: &Scope<'_>) -> Option<String> {
        let id = scope.match_fragment(fragment, scope.block)?;
        if self.mode == ResolveMode::External
            && let Some(online) = self.online
            && let Some(page) = scope.page_holding(&id)
        {
            return Some(online.url_for(page, Some(page)));
        }
        Some(format!("#{id}"))
    }

    /// Renders a reference to a page of the bundle.
    fn page_reference(
        &self,
        page: &str,
        anchor: &str,
        fragment: Option<&str>,
        scope: &Scope<'_>,
    ) -> String {
        if self.mode == ResolveMode::External
            && let Some(online) = self.online
        {
            let raw = match fragment {
                Some(fragment) => format!("{page}#{fragment}"),
                None => page.to_string(),
            };
            return online.url_for(&raw, Some(page));
        }
        fragment
            .filter(|f| !f.is_empty())
            .and_then(|f| scope.match_fragment(f, scope.block_of(page)))
            .map_or_else(|| format!("#{anchor}"), |id| format!("#{id}"))
    }

    /// Looks a page up by the file stem of `path`.
    fn lookup_stem(&self, path: &str, scope: &Scope<'_>) -> Option<(String, String)> {
        let anchor = self.anchors.by_basename(page_stem(path))?;
        let page = scope.reverse.get(anchor).copied().unwrap_or(path);
        Some((page.to_string(), anchor.to_string()))
    }

    /// Layer 1: resolves `path` against the directory of the link's page.
    fn resolve_in_block(
        &self,
        path: &str,
        fragment: Option<&str>,
        scope: &Scope<'_>,
    ) -> Option<String> {
        let block = &scope.blocks[scope.block?];
        let page = block.page?;

        let (stripped, _) = strip_rel_and_ext(path);
        let normalized = normalize_target_path(&stripped, self.family(), None).path;
        let candidates: Vec<String> = join_relative(block.directory(), path)
            .into_iter()
            .chain([normalized, stripped])
            .map(|c| with_extension(&c, &self.page_extension))
            .collect();

        for candidate in &candidates {
            if let Some(anchor) = self.anchors.by_path(candidate) {
                return Some(self.page_reference(candidate, anchor, fragment, scope));
            }
        }

        // A reference out of the bundle, or to a published page the bundle lacks.
        let leaves_bundle = fragment.is_some()
            || !extension_of(path).is_some_and(|e| e.eq_ignore_ascii_case(&self.page_extension));
        if !leaves_bundle
            && let Some((local, anchor)) = self.lookup_stem(path, scope)
        {
            return Some(self.page_reference(&local, &anchor, fragment, scope));
        }
        if let Some(online) = self.online
            && leaves_bundle
        {
            let raw = match fragment {
                Some(fragment) => format!("{path}#{fragment}"),
                None => path.to_string(),
            };
            return Some(online.url_for(&raw, Some(page)));
        }
        debug!("no page for {path} in {page}");
        None
    }

    /// Layer 3: retries with `../` removed step by step and the `Content/` prefix toggled.
    fn global_fallback(
        &self,
        path: &str,
        fragment: Option<&str>,
        scope: &Scope<'_>,
    ) -> Option<String> {
        let mut variant = path.replace('\\', "/");
        loop {
            let toggled = match variant.strip_prefix("Content/") {
                Some(rest) => rest.to_string(),
                None => format!("Content/{variant}"),
            };
            for candidate in [variant.as_str(), toggled.as_str()] {
                let candidate = with_extension(candidate, &self.page_extension);
                if let Some(anchor) = self.anchors.by_path(&candidate) {
                    return Some(self.page_reference(&candidate, anchor, fragment, scope));
                }
            }
            match variant
                .strip_prefix("../")
                .or_else(|| variant.strip_prefix("./"))
            {
                Some(rest) => variant = rest.to_string(),
                None => break,
            }
        }

        let (page, anchor) = self.lookup_stem(path, scope)?;
        debug!("{path} matched by file stem");
        Some(self.page_reference(&page, &anchor, fragment, scope))
    }
}
