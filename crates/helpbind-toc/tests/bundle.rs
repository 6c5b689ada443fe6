//! Integration tests for helpbind-toc.
//!
//! Builds small bundles on disk and runs discovery -> parse -> linearize -> outline.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use helpbind_toc::{
    FsPageSource, LinearPage, Linearizer, NoExclusions, TocDiagnostic, TocError, load_bundle,
    read_hierarchy, write_outline,
};

/// Test helper to create a temporary bundle.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Creates converted pages.
    fn pages(&self, paths: &[&str]) {
        for path in paths {
            self.create_file(path, "# Page\n");
        }
    }
}

const CHUNK: &str = r#"/* MadCap generated */
define({'/Content/Intro.htm':{i:[0],t:['Introduction'],b:['']},
'/Content/_FT_SideNav_Startup.htm':{i:[1],t:['Navigation'],b:['']},
'/Content/Setup/Install.htm':{i:[2],t:['Install'],b:['']},
'/Content/Setup/Configure.htm':{i:[3],t:['Configure'],b:['']},
"/Content/Missing.htm":{i:[4],t:["Gone"],b:[""]},
'/Content/Setup/Advanced.htm':{i:[5],t:['Advanced'],b:['']},
});"#;

const HIERARCHY: &str = r"define({numchunks:1,prefix:'Toc_Chunk',chunkstart:['/Content/Intro.htm'],
tree:{n:[{i:0,c:0,n:[
  {i:1,c:0,n:[{i:2,c:0},{i:3,c:0}]},
  {i:4,c:0,n:[{i:5,c:0}]},
]},
{i:0,c:0}
]}});";

fn bundle() -> TestEnv {
    let env = TestEnv::new();
    env.create_file("Data/Tocs/Toc.js", HIERARCHY);
    env.create_file("Data/Tocs/Toc_Chunk0.js", CHUNK);
    env.pages(&[
        "Content/Intro.md",
        "Content/_FT_SideNav_Startup.md",
        "Content/Setup/Install.md",
        "Content/Setup/Configure.md",
        "Content/Setup/Advanced.md",
    ]);
    env
}

#[test]
fn test_linearize_bundle_with_exclusion_and_missing_page() {
    let env = bundle();
    let toc = load_bundle(env.path()).unwrap();
    assert!(toc.skipped.is_empty());
    assert_eq!(toc.table.len(), 6);

    let source = FsPageSource::new(env.path());
    let exclude = |page: &str| page.rsplit('/').next().is_some_and(|n| n.starts_with("_FT_SideNav"));
    let result = Linearizer::new(&source, &exclude).linearize(&toc.roots);

    let order: Vec<(&str, usize)> = result.hierarchy();
    assert_eq!(
        order,
        vec![
            ("Content/Intro.md", 1),
            ("Content/Setup/Install.md", 3),
            ("Content/Setup/Configure.md", 3),
            ("Content/Setup/Advanced.md", 2),
        ]
    );
    assert_eq!(result.pages[0].title, "Introduction");
    assert_eq!(
        result.diagnostics,
        vec![
            TocDiagnostic::MissingTarget {
                id: "4".into(),
                page: "Content/Missing.md".into(),
            },
            TocDiagnostic::DuplicatePage {
                page: "Content/Intro.md".into(),
            },
        ]
    );
}

#[test]
fn test_outline_files_round_trip_depths() {
    let env = bundle();
    let toc = load_bundle(env.path()).unwrap();
    let source = FsPageSource::new(env.path());
    let result = Linearizer::new(&source, &NoExclusions).linearize(&toc.roots);

    write_outline(env.path(), &result.pages).unwrap();
    let toc_txt = fs::read_to_string(env.path().join("__toc.txt")).unwrap();
    assert!(toc_txt.starts_with("Content/Intro.md\nContent/_FT_SideNav_Startup.md\n"));

    let back = read_hierarchy(env.path()).unwrap();
    let expected: Vec<LinearPage> = result
        .pages
        .iter()
        .map(|p| LinearPage::new(p.relative_path.clone(), p.depth, ""))
        .collect();
    assert_eq!(back, expected);
}

#[test]
fn test_unparsable_hierarchy_is_reported() {
    let env = TestEnv::new();
    env.create_file("Data/Tocs/Toc.js", "define({tree: {n: [{i: 0,, }]}");
    env.create_file("Data/Tocs/Toc_Chunk0.js", "define({'/a.htm': {i: [0], t: ['A']}});");

    let toc = load_bundle(env.path()).unwrap();
    assert!(toc.roots.is_empty());
    assert_eq!(toc.skipped.len(), 1);
    let message = toc.skipped[0].to_string();
    assert!(message.contains("unparsable TOC definition"), "{message}");
    assert!(matches!(toc.skipped[0], TocError::Unparsable { .. }));
}
