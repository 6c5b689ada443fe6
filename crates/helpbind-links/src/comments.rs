//! Unwrapping links hidden in HTML comments.
//!
//! Converted pages sometimes keep a link commented out (`<!-- [text](url) -->`), typically
//! where the source system suppressed it for print. Such links are restored as plain
//! Markdown; other comments are left alone.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A comment holding nothing but a Markdown link.
static COMMENTED_MARKDOWN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*(\[[^\]]*\]\([^()\s]+\))\s*-->").expect("commented link pattern is valid")
});

/// A comment holding nothing but an `<a href>` element.
static COMMENTED_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<!--\s*<a\s[^>]*?href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a\s*>\s*-->"#)
        .expect("commented anchor pattern is valid")
});

/// Restores links wrapped in HTML comments.
pub fn unwrap_commented_links(text: &str) -> String {
    let text = COMMENTED_MARKDOWN_RE.replace_all(text, "$1");
    COMMENTED_ANCHOR_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            let label = caps[2].split_whitespace().collect::<Vec<_>>().join(" ");
            format!("[{label}]({})", &caps[1])
        })
        .into_owned()
}
