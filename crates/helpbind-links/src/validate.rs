//! Checking that every in-document fragment reference has a target.

use std::{collections::HashSet, fmt};

use helpbind_document::{block_index_at, collect_anchors, split_blocks};
use log::{info, warn};

use crate::scan::{decode_target, line_at, scan_links};

/// A `#fragment` reference with no anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAnchor {
    /// The fragment, without `#`.
    pub fragment: String,
    /// Page the reference was written in, if it follows a boundary marker.
    pub page: Option<String>,
    /// Line of the reference.
    pub line: usize,
}

impl fmt::Display for MissingAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page.as_deref().unwrap_or("-");
        write!(f, "{page}:{}: #{}", self.line, self.fragment)
    }
}

/// Outcome of validating a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Distinct anchors the document defines.
    pub anchors: usize,
    /// Fragment references checked.
    pub references: usize,
    /// References with no matching anchor, in document order.
    pub missing: Vec<MissingAnchor>,
}

impl ValidationReport {
    /// True when every reference has an anchor.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Validates the fragment references of `document` against its anchors.
///
/// Anchors are explicit tags plus heading slugs under the allocation suffix rule. Only
/// same-document references (`#fragment`) are checked; the document is not modified.
pub fn validate_document(document: &str) -> ValidationReport {
    let anchors: HashSet<String> = collect_anchors(document)
        .into_iter()
        .map(|anchor| anchor.id)
        .collect();
    let blocks = split_blocks(document);

    let mut report = ValidationReport {
        anchors: anchors.len(),
        ..ValidationReport::default()
    };

    for link in scan_links(document) {
        let Some(fragment) = link.target.strip_prefix('#') else {
            continue;
        };
        if fragment.is_empty() {
            continue;
        }
        report.references += 1;
        let fragment = decode_target(fragment);
        if anchors.contains(fragment.as_ref()) {
            continue;
        }
        let page = block_index_at(&blocks, link.range.start)
            .and_then(|i| blocks[i].page)
            .map(str::to_string);
        let missing = MissingAnchor {
            fragment: fragment.into_owned(),
            page,
            line: line_at(document, link.range.start),
        };
        warn!("missing anchor {missing}");
        report.missing.push(missing);
    }

    info!(
        "validated {} references against {} anchors, {} missing",
        report.references,
        report.anchors,
        report.missing.len()
    );
    report
}
