//! Finding link targets in Markdown text.

use std::{borrow::Cow, ops::Range, sync::LazyLock};

use helpbind_document::code_ranges;
use percent_encoding::percent_decode_str;
use regex::Regex;

/// Matches an inline Markdown link or image; group 1 is the image `!`, group 2 the target.
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[(?:[^\[\]]|\[[^\]]*\])*\]\(\s*<?([^()\s<>]+)>?(?:\s+["'][^"']*["'])?\s*\)"#)
        .expect("markdown link pattern is valid")
});

/// Matches an HTML `href` attribute; group 1 is the target.
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']*)["']"#).expect("href pattern is valid")
});

/// Schemes whose targets are never rewritten.
const EXTERNAL_SCHEMES: [&str; 5] = ["http:", "https:", "mailto:", "ftp:", "data:"];

/// How a link was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `[text](target)`.
    Markdown,
    /// `href="target"`.
    Href,
}

/// A link target found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSite {
    /// How the link was written.
    pub kind: LinkKind,
    /// The target as written.
    pub target: String,
    /// Byte range of the target text.
    pub range: Range<usize>,
}

/// Finds every link target in `text`, in document order.
///
/// Images are not links. Targets inside code blocks and code spans are skipped.
pub fn scan_links(text: &str) -> Vec<LinkSite> {
    let code = code_ranges(text);
    let markdown = MARKDOWN_LINK_RE.captures_iter(text).filter_map(|caps| {
        if !caps.get(1)?.as_str().is_empty() {
            return None;
        }
        let target = caps.get(2)?;
        Some(LinkSite {
            kind: LinkKind::Markdown,
            target: target.as_str().to_string(),
            range: target.range(),
        })
    });
    let href = HREF_RE.captures_iter(text).filter_map(|caps| {
        let target = caps.get(1)?;
        Some(LinkSite {
            kind: LinkKind::Href,
            target: target.as_str().to_string(),
            range: target.range(),
        })
    });

    let mut links: Vec<LinkSite> = markdown
        .chain(href)
        .filter(|link| !code.iter().any(|range| range.contains(&link.range.start)))
        .collect();
    links.sort_by_key(|link| link.range.start);
    links
}

/// Returns true for targets on another host or scheme.
pub fn is_external(target: &str) -> bool {
    let target = target.trim();
    target.starts_with("//")
        || EXTERNAL_SCHEMES.iter().any(|scheme| {
            target
                .get(..scheme.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        })
}

/// Decodes percent escapes in a target, keeping it as written if it is not valid UTF-8.
pub fn decode_target(target: &str) -> Cow<'_, str> {
    percent_decode_str(target)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(target))
}

/// Splits `target` at the first `#`.
pub fn split_fragment(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (target, None),
    }
}

/// Returns the 1-based line number of byte `offset`.
pub fn line_at(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_markdown_and_href_targets() {
        let text = "See [A](a.md) and <a href=\"b.htm#x\">B</a>.\n![img](pic.png)\n";
        let links = scan_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target, "a.md");
        assert_eq!(links[0].kind, LinkKind::Markdown);
        assert_eq!(&text[links[0].range.clone()], "a.md");
        assert_eq!(links[1].target, "b.htm#x");
        assert_eq!(links[1].kind, LinkKind::Href);
    }

    #[test]
    fn link_wrapping_an_image() {
        let text = "[![logo](logo.png)](Content/Home.md)";
        let links = scan_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "Content/Home.md");
    }

    #[test]
    fn link_with_title_and_angle_brackets() {
        let links = scan_links("[a](<x.md> \"Title\") [b](y.md 'T')");
        let targets: Vec<&str> = links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["x.md", "y.md"]);
    }

    #[test]
    fn code_is_skipped() {
        let text = "```\n[example](b.md)\n```\n\n`<a href=\"#x\">` and [real](c.md)\n";
        let links = scan_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "c.md");
    }

    #[test]
    fn external_targets() {
        assert!(is_external("https://example.com"));
        assert!(is_external("HTTP://example.com"));
        assert!(is_external("mailto:a@b.c"));
        assert!(is_external("data:image/png;base64,xx"));
        assert!(is_external("//cdn.example.com/x"));
        assert!(!is_external("Content/a.md"));
        assert!(!is_external("#anchor"));
    }

    #[test]
    fn decoding() {
        assert_eq!(decode_target("My%20Page.md"), "My Page.md");
        assert_eq!(decode_target("bad%FF.md"), "bad%FF.md");
    }

    #[test]
    fn fragments_and_lines() {
        assert_eq!(split_fragment("a.md#b#c"), ("a.md", Some("b#c")));
        assert_eq!(split_fragment("#x"), ("", Some("x")));
        assert_eq!(split_fragment("a.md"), ("a.md", None));
        assert_eq!(line_at("a\nb\nc", 0), 1);
        assert_eq!(line_at("a\nb\nc", 4), 3);
    }
}
