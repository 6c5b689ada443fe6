//! The external-links variant of an assembled document.
//!
//! Same content, but every page reference points at the published site. Boundary markers
//! become visible `[[BEGIN_FILE: ...]]` lines and the "view online" decorations become a
//! plain URL line under their heading.

use std::sync::LazyLock;

use helpbind_document::AnchorMap;
use regex::{Captures, Regex};

use crate::{
    resolve::{LinkResolver, Resolution, ResolveMode},
    url::OnlineLinker,
};

/// A boundary marker line.
static MARKER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*<!--\s*BEGIN_FILE:\s*(.*?)\s*-->[ \t]*$")
        .expect("marker line pattern is valid")
});

/// A heading line ending in the "view online" decoration.
static DECORATED_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(#{1,6}[ \t].*?)[ \t]*\[↗\]\(([^()\s]+)\)[ \t]*$")
        .expect("decorated heading pattern is valid")
});

/// Reformats a resolved document for reading outside the assembled output.
pub fn format_external(document: &str) -> String {
    let document = MARKER_LINE_RE.replace_all(document, "[[BEGIN_FILE: $1]]");
    DECORATED_HEADING_RE
        .replace_all(&document, |caps: &Captures<'_>| {
            format!("{}\n\n[{url}]({url})", &caps[1], url = &caps[2])
        })
        .into_owned()
}

/// Builds the external-links variant from an assembled document and its anchor map.
pub fn build_external(
    document: &str,
    anchors: &AnchorMap,
    online: &OnlineLinker<'_>,
    page_extension: &str,
) -> Resolution {
    let mut resolution = LinkResolver::new(anchors)
        .with_online(online)
        .with_mode(ResolveMode::External)
        .with_page_extension(page_extension)
        .resolve(document);
    resolution.document = format_external(&resolution.document);
    resolution
}
