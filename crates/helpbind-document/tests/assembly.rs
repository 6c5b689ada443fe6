//! Integration tests for helpbind-document.
//!
//! Assembles pages from disk and checks the anchor invariants of the result.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{collections::HashSet, fs, path::Path};

use helpbind_document::{ANCHOR_MAP_FILE, Assembler, AnchorMap, collect_anchors, split_blocks};
use helpbind_toc::{FsPageSource, LinearPage, read_hierarchy, write_outline};

fn write_pages(root: &Path, pages: &[(&str, &str)]) {
    for (path, body) in pages {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, body).unwrap();
    }
}

#[test]
fn test_every_anchor_is_unique() {
    let dir = tempfile::tempdir().unwrap();
    write_pages(
        dir.path(),
        &[
            ("Content/Overview.md", "# Overview\n\n## Details\n"),
            ("Content/A/Overview.md", "# Overview\n\n## Details\n"),
            ("Content/B/Overview.md", "Headerless.\n"),
            ("Content/C.md", "<a id=\"overview-1\"></a>\n\n# Overview\n"),
        ],
    );
    let pages = vec![
        LinearPage::new("Content/Overview.md", 1, ""),
        LinearPage::new("Content/A/Overview.md", 2, ""),
        LinearPage::new("Content/B/Overview.md", 2, ""),
        LinearPage::new("Content/C.md", 1, ""),
    ];

    let source = FsPageSource::new(dir.path());
    let assembly = Assembler::new(&source).assemble(&pages);

    let anchors = collect_anchors(&assembly.document);
    let mut seen = HashSet::new();
    let legacy_offset = assembly.document.find("<a id=\"overview-1\">").unwrap();
    for anchor in anchors.iter().filter(|a| a.offset != legacy_offset) {
        assert!(seen.insert(anchor.id.clone()), "duplicate anchor {}", anchor.id);
    }

    let page_anchors: HashSet<&String> = assembly.anchors.by_path.values().collect();
    assert_eq!(page_anchors.len(), 4);
    assert_eq!(assembly.anchors.by_path("Content/A/Overview.md"), Some("overview-1"));
    assert_eq!(assembly.anchors.by_path("Content/B/Overview.md"), Some("overview-2"));
    // The legacy tag repeats an id already handed out; the dedupe pass renames it later.
    assert_eq!(assembly.anchors.by_path("Content/C.md"), Some("overview-3"));
    assert_eq!(assembly.anchors.by_basename("Overview"), Some("overview"));

    let blocks = split_blocks(&assembly.document);
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[2].page, Some("Content/B/Overview.md"));
}

#[test]
fn test_heading_levels_follow_persisted_hierarchy() {
    let dir = tempfile::tempdir().unwrap();
    write_pages(
        dir.path(),
        &[
            ("a.md", "## Alpha\n\n### Alpha detail\n"),
            ("b.md", "# Beta\n"),
        ],
    );
    write_outline(
        dir.path(),
        &[LinearPage::new("a.md", 1, ""), LinearPage::new("b.md", 3, "")],
    )
    .unwrap();

    let pages = read_hierarchy(dir.path()).unwrap();
    let source = FsPageSource::new(dir.path());
    let assembly = Assembler::new(&source).assemble(&pages);

    assert!(assembly.document.contains("\n# Alpha\n\n## Alpha detail\n"));
    assert!(assembly.document.contains("\n### Beta\n"));
}

#[test]
fn test_anchor_map_persists_next_to_document() {
    let dir = tempfile::tempdir().unwrap();
    write_pages(dir.path(), &[("a.md", "# Alpha\n")]);
    let source = FsPageSource::new(dir.path());
    let assembly = Assembler::new(&source).assemble(&[LinearPage::new("a.md", 1, "")]);

    let map_path = dir.path().join(ANCHOR_MAP_FILE);
    assembly.anchors.save(&map_path).unwrap();
    let loaded = AnchorMap::load(&map_path).unwrap();
    assert_eq!(loaded.lookup("a.md"), Some("alpha"));
}
