//! Integration tests for helpbind-links.
//!
//! Assembles small bundles in memory, then runs resolve -> dedupe -> validate over the result.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::collections::HashSet;

use helpbind_document::{Assembler, Assembly, collect_anchors};
use helpbind_links::{
    AnchorChange, DocFamily, LinkResolver, OnlineLinker, OnlineSite, PrefixSubfolders,
    build_external, dedupe_anchors, validate_document,
};
use helpbind_toc::{LinearPage, MemoryPageSource};

const BASE: &str = "https://docs.example.com";
const SITE: &str = "Content_25.4_Documentation";

fn assemble(pages: &[(&str, &str, usize)]) -> Assembly {
    let mut source = MemoryPageSource::new();
    for (path, body, _) in pages {
        source.insert(*path, *body);
    }
    let linear: Vec<LinearPage> = pages
        .iter()
        .map(|(path, _, depth)| LinearPage::new(*path, *depth, ""))
        .collect();
    Assembler::new(&source).assemble(&linear)
}

fn guide() -> Assembly {
    assemble(&[
        (
            "Content/Guide/intro.md",
            "# Overview\n\nSee [setup](setup.md), [details](setup.md#_Toc_Details_1) and \
             [query](../Actions/Query.htm#Params).\n",
            1,
        ),
        (
            "Content/Guide/setup.md",
            "# Setup\n\n## Details\n\n<a id=\"overview\"></a>Legacy.\n",
            2,
        ),
        (
            "Content/Guide/notes.md",
            "Notes with a [back link](#overview).\n",
            2,
        ),
    ])
}

#[test]
fn test_url_literal_cases() {
    let inference = PrefixSubfolders::default();

    let standard = OnlineSite::new(BASE, SITE);
    let linker = OnlineLinker::new(&standard, &inference);
    assert_eq!(
        linker.url_for("../../ENCODINGS/_IDOL_ENCODINGS.md", None),
        format!("{BASE}/{SITE}/Help/Content/Actions/ENCODINGS/_IDOL_ENCODINGS.htm")
    );
    assert_eq!(
        linker.url_for("../../Actions/Query/Query.htm", None),
        format!("{BASE}/{SITE}/Help/Content/Actions/Query/Query.htm")
    );

    let merged = OnlineSite::new(BASE, "IDOLServer_25.4_Documentation")
        .with_family(DocFamily::MergedMultiGuide)
        .with_subfolder("expert");
    let linker = OnlineLinker::new(&merged, &inference);
    assert_eq!(
        linker.url_for("Content/IDOLExpert/EnrichContent/Categorize_Documents.htm", None),
        format!(
            "{BASE}/IDOLServer_25.4_Documentation/Guides/html/expert/Content/IDOLExpert/EnrichContent/Categorize_Documents.htm"
        )
    );
    let license = linker.url_for("../Shared_Admin/_ADM_Licenses.htm", None);
    assert!(
        license.starts_with(&format!("{BASE}/LicenseServer_25.4_Documentation/Help/")),
        "{license}"
    );
}

#[test]
fn test_resolve_dedupe_validate_leaves_no_orphans() {
    let assembly = guide();
    let site = OnlineSite::new(BASE, SITE);
    let inference = PrefixSubfolders::default();
    let online = OnlineLinker::new(&site, &inference);

    let resolution = LinkResolver::new(&assembly.anchors)
        .with_online(&online)
        .resolve(&assembly.document);
    let doc = &resolution.document;
    assert!(doc.contains("[setup](#setup)"), "{doc}");
    assert!(doc.contains("[details](#details)"), "{doc}");
    assert!(doc.contains(&format!(
        "[query]({BASE}/{SITE}/Help/Content/Actions/Query.htm#Params)"
    )));
    assert!(doc.contains("[back link](#overview)"));
    assert!(resolution.unresolved.is_empty());

    let deduped = dedupe_anchors(doc);
    assert_eq!(
        deduped.changes,
        vec![AnchorChange::Renamed {
            from: "overview".into(),
            to: "overview-1".into(),
            line: 11,
        }]
    );

    let ids: Vec<String> = collect_anchors(&deduped.document)
        .into_iter()
        .map(|a| a.id)
        .collect();
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "{ids:?}");

    let report = validate_document(&deduped.document);
    assert!(report.is_clean(), "{:?}", report.missing);
    assert_eq!(report, validate_document(&deduped.document));
}

#[test]
fn test_unplaced_links_are_reported_not_dropped() {
    let assembly = assemble(&[
        ("a.md", "# A\n\n[x](nowhere.md) [y](#nothing)\n", 1),
        ("b.md", "# B\n", 1),
    ]);
    let resolution = LinkResolver::new(&assembly.anchors).resolve(&assembly.document);
    assert_eq!(resolution.document, assembly.document);
    let targets: Vec<&str> = resolution
        .unresolved
        .iter()
        .map(|u| u.target.as_str())
        .collect();
    assert_eq!(targets, vec!["nowhere.md", "#nothing"]);

    let report = validate_document(&resolution.document);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].fragment, "nothing");
}

#[test]
fn test_external_variant_points_online() {
    let assembly = guide();
    let site = OnlineSite::new(BASE, SITE);
    let inference = PrefixSubfolders::default();
    let online = OnlineLinker::new(&site, &inference);

    let external = build_external(&assembly.document, &assembly.anchors, &online, "md");
    let doc = &external.document;
    assert!(doc.contains("[[BEGIN_FILE: Content/Guide/intro.md]]"));
    assert!(!doc.contains("<!-- BEGIN_FILE"));
    assert!(doc.contains(&format!("[setup]({BASE}/{SITE}/Help/Content/Guide/setup.htm)")));
    assert!(doc.contains(&format!(
        "[back link]({BASE}/{SITE}/Help/Content/Guide/intro.htm)"
    )));
    assert!(external.unresolved.is_empty());
}

#[test]
fn test_bookmark_links_survive_dedupe() {
    let assembly = assemble(&[(
        "a.md",
        "# Alpha\n\n<a id=\"_Toc123\"></a>\n\n## Install\n\n[see](#_Toc123)\n",
        1,
    )]);
    let resolution = LinkResolver::new(&assembly.anchors).resolve(&assembly.document);
    assert!(resolution.document.contains("[see](#install)"));

    let deduped = dedupe_anchors(&resolution.document);
    assert!(!deduped.document.contains("_Toc123\""), "{}", deduped.document);

    let report = validate_document(&deduped.document);
    assert!(report.is_clean(), "{:?}", report.missing);
}

#[test]
fn test_links_in_code_are_left_alone() {
    let assembly = assemble(&[
        (
            "a.md",
            "# Alpha\n\n```\n[example](b.md) [x](#x)\n```\n\nInline `[b](b.md)` and [real](b.md).\n",
            1,
        ),
        ("b.md", "# Beta\n", 1),
    ]);
    let resolution = LinkResolver::new(&assembly.anchors).resolve(&assembly.document);
    let doc = &resolution.document;
    assert_eq!(resolution.rewritten, 1);
    assert!(doc.contains("[example](b.md) [x](#x)"), "{doc}");
    assert!(doc.contains("`[b](b.md)`"), "{doc}");
    assert!(doc.contains("[real](#beta)"), "{doc}");
    assert!(resolution.unresolved.is_empty());

    let report = validate_document(doc);
    assert!(report.is_clean(), "{:?}", report.missing);
    assert_eq!(report.references, 1);
}
