//! Locating anchor-bearing constructs in Markdown text.
//!
//! Both headings and explicit `<a id="...">` tags define navigation targets. Allocation,
//! deduplication and validation all walk them through [`scan_sites`], so every pass sees the
//! same targets in the same order. Constructs inside code blocks and code spans are ignored.

use std::{ops::Range, sync::LazyLock};

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;

/// Matches an opening `<a>` tag carrying an `id` or `name` attribute.
pub static ANCHOR_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s(?:[^>]*?\s)?(?:id|name)\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("anchor tag pattern is valid")
});

/// Matches Word bookmark and MadCap auto-generated ids that carry no meaning.
pub static DISPOSABLE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:_Toc\d+|_Ref\d+|_Hlk\d+|o\d+)$").expect("disposable id pattern is valid")
});

/// Returns true for legacy ids that are dropped rather than kept.
pub fn is_disposable_id(id: &str) -> bool {
    DISPOSABLE_ID_RE.is_match(id)
}

/// A heading found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSite {
    /// Heading level, 1 to 6.
    pub level: usize,
    /// Plain heading text (inline markup removed).
    pub text: String,
    /// Byte range of the whole heading construct.
    pub range: Range<usize>,
    /// True for `#` headings, false for underlined (setext) headings.
    pub atx: bool,
}

/// An explicit anchor tag found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitSite {
    /// The id attribute value.
    pub id: String,
    /// Byte range of the opening tag.
    pub range: Range<usize>,
}

/// A navigation target in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorSite {
    /// A heading.
    Heading(HeadingSite),
    /// An explicit anchor tag.
    Explicit(ExplicitSite),
}

impl AnchorSite {
    /// Byte offset where the site starts.
    pub fn start(&self) -> usize {
        match self {
            Self::Heading(h) => h.range.start,
            Self::Explicit(e) => e.range.start,
        }
    }
}

/// Converts a pulldown-cmark heading level to a number.
fn level_number(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Finds headings and explicit anchor tags in document order.
///
/// An anchor tag inside a heading is reported before the heading itself.
pub fn scan_sites(content: &str) -> Vec<AnchorSite> {
    let mut sites = Vec::new();
    let mut current_heading: Option<(HeadingLevel, usize, String)> = None;

    for (event, range) in Parser::new(content).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level, range.start, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, ref mut heading_text)) = current_heading {
                    heading_text.push(' ');
                }
            }
            Event::Html(_) | Event::InlineHtml(_) => {
                let html = &content[range.clone()];
                sites.extend(ANCHOR_TAG_RE.captures_iter(html).filter_map(|caps| {
                    let whole = caps.get(0)?;
                    Some(AnchorSite::Explicit(ExplicitSite {
                        id: caps.get(1)?.as_str().trim().to_string(),
                        range: range.start + whole.start()..range.start + whole.end(),
                    }))
                }));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, start, text)) = current_heading.take() {
                    let atx = content[start..].trim_start().starts_with('#');
                    sites.push(AnchorSite::Heading(HeadingSite {
                        level: level_number(level),
                        text: text.trim().to_string(),
                        range: start..range.end,
                        atx,
                    }));
                }
            }
            _ => {}
        }
    }

    sites
}

/// Byte ranges of code blocks and code spans, in document order.
pub fn code_ranges(content: &str) -> Vec<Range<usize>> {
    Parser::new(content)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect()
}

/// Returns the headings of `content` in order.
pub fn extract_headings(content: &str) -> Vec<HeadingSite> {
    scan_sites(content)
        .into_iter()
        .filter_map(|site| match site {
            AnchorSite::Heading(h) => Some(h),
            AnchorSite::Explicit(_) => None,
        })
        .collect()
}
