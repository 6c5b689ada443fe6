//! Anchor allocation and document assembly for helpbind.
//!
//! Turns a linearized page list into one Markdown document:
//!
//! - **Slugs**: deterministic, collision-free anchor ids ([`Slugifier`])
//! - **Anchors**: one anchor per page, persisted as an [`AnchorMap`]
//! - **Levels**: per-page heading shift so headings follow the outline depth
//! - **Assembly**: boundary markers, explicit anchors and "view online" decorations
//!
//! Headings and explicit anchor tags are located with `pulldown-cmark`, so constructs inside
//! code blocks never count.

#![warn(missing_docs)]

mod anchors;
mod assemble;
mod error;
mod levels;
mod marker;
mod sites;
mod slug;

pub use anchors::{
    ANCHOR_MAP_FILE, AnchorAllocator, AnchorMap, DocumentAnchor, PageAnchor, collect_anchors,
    page_stem,
};
pub use assemble::{
    Assembler, Assembly, NoOnline, ONLINE_GLYPH, ViewOnline, anchor_tag, decorate_first_heading,
    online_decoration,
};
pub use error::DocumentError;
pub use levels::normalize_heading_levels;
pub use marker::{Block, begin_marker, block_index_at, find_markers, split_blocks};
pub use sites::{
    ANCHOR_TAG_RE, AnchorSite, ExplicitSite, HeadingSite, code_ranges, extract_headings,
    is_disposable_id, scan_sites,
};
pub use slug::{Slugifier, slugify};
