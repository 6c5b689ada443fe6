//! Final anchor uniqueness pass.
//!
//! Legacy pages carry their own `<a id>` tags, some of which repeat ids generated for
//! headings or other pages. Walking every anchor site in order through one [`Slugifier`]
//! keeps the first claim of an id, renames later explicit duplicates, and drops ids that are
//! known to be disposable.

use std::{fmt, ops::Range, sync::LazyLock};

use helpbind_document::{AnchorSite, ExplicitSite, Slugifier, is_disposable_id, scan_sites};
use log::{debug, info};
use regex::Regex;

use crate::scan::line_at;

/// Matches one `id`/`name` attribute inside a tag; group 1 is the value.
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s(?:id|name)\s*=\s*["']([^"']*)["']"#).expect("id attribute pattern is valid")
});

/// Matches an opening tag with nothing but anchor attributes.
static BARE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^<a(?:\s+(?:id|name)\s*=\s*["'][^"']*["'])+\s*/?>$"#)
        .expect("bare anchor tag pattern is valid")
});

/// Closing tag directly after a bare anchor.
static CLOSING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*</a\s*>").expect("closing tag pattern is valid"));

/// A change made to an explicit anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorChange {
    /// A repeated id was given a numeric suffix.
    Renamed {
        /// The id as written.
        from: String,
        /// The new id.
        to: String,
        /// Line of the tag.
        line: usize,
    },
    /// A disposable id was removed.
    Dropped {
        /// The id as written.
        id: String,
        /// Line of the tag.
        line: usize,
    },
}

impl fmt::Display for AnchorChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed { from, to, line } => write!(f, "line {line}: renamed #{from} to #{to}"),
            Self::Dropped { id, line } => write!(f, "line {line}: dropped #{id}"),
        }
    }
}

/// The deduplicated document.
#[derive(Debug, Clone, Default)]
pub struct Deduplication {
    /// Document with unique explicit anchors.
    pub document: String,
    /// Changes made, in document order.
    pub changes: Vec<AnchorChange>,
}

/// Ranges of the `id`/`name` attributes of `tag` whose value is `id`.
fn attribute_ranges(document: &str, tag: &ExplicitSite) -> Vec<(Range<usize>, Range<usize>)> {
    let text = &document[tag.range.clone()];
    ID_ATTR_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.get(1)?;
            (value.as_str().trim() == tag.id).then(|| {
                let base = tag.range.start;
                (
                    base + whole.start()..base + whole.end(),
                    base + value.start()..base + value.end(),
                )
            })
        })
        .collect()
}

/// Edits removing a disposable anchor tag.
fn drop_edits(document: &str, tag: &ExplicitSite) -> Vec<(Range<usize>, String)> {
    let text = &document[tag.range.clone()];
    if BARE_TAG_RE.is_match(text) {
        let end = CLOSING_RE
            .find(&document[tag.range.end..])
            .map_or(tag.range.end, |m| tag.range.end + m.end());
        return vec![(tag.range.start..end, String::new())];
    }
    attribute_ranges(document, tag)
        .into_iter()
        .map(|(attribute, _)| (attribute, String::new()))
        .collect()
}

/// Makes every explicit anchor id in `document` unique.
///
/// Headings claim their slugs in order alongside the tags, so a tag repeating a heading's
/// id is renamed as well.
pub fn dedupe_anchors(document: &str) -> Deduplication {
    let mut slugifier = Slugifier::new();
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut changes = Vec::new();

    for site in scan_sites(document) {
        match site {
            AnchorSite::Heading(heading) => {
                slugifier.slugify(&heading.text);
            }
            AnchorSite::Explicit(tag) => {
                if tag.id.is_empty() {
                    continue;
                }
                let line = line_at(document, tag.range.start);
                if is_disposable_id(&tag.id) {
                    debug!("dropping disposable anchor #{}", tag.id);
                    edits.extend(drop_edits(document, &tag));
                    changes.push(AnchorChange::Dropped { id: tag.id, line });
                    continue;
                }
                let claimed = slugifier.reserve(&tag.id);
                if claimed != tag.id {
                    debug!("renaming duplicate anchor #{} to #{claimed}", tag.id);
                    edits.extend(
                        attribute_ranges(document, &tag)
                            .into_iter()
                            .map(|(_, value)| (value, claimed.clone())),
                    );
                    changes.push(AnchorChange::Renamed {
                        from: tag.id,
                        to: claimed,
                        line,
                    });
                }
            }
        }
    }

    edits.sort_by_key(|(range, _)| range.start);
    let mut out = document.to_string();
    for (range, text) in edits.into_iter().rev() {
        out.replace_range(range, &text);
    }
    if !changes.is_empty() {
        info!("anchor dedupe made {} changes", changes.len());
    }
    Deduplication {
        document: out,
        changes,
    }
}
