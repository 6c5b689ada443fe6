//! Access to converted page bodies.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

/// Yields the converted text of a page given its bundle-relative path.
///
/// Paths use `/` separators and carry the page-body extension (`Content/a.md`).
pub trait PageSource {
    /// Returns true if the page exists.
    fn exists(&self, page: &str) -> bool;

    /// Reads the page body.
    fn read(&self, page: &str) -> io::Result<String>;
}

/// Pages stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsPageSource {
    /// Directory the page paths are relative to.
    root: PathBuf,
}

impl FsPageSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins a page path onto the root.
    fn path_of(&self, page: &str) -> PathBuf {
        page.split('/')
            .filter(|seg| !seg.is_empty())
            .fold(self.root.clone(), |path, seg| path.join(seg))
    }
}

impl PageSource for FsPageSource {
    fn exists(&self, page: &str) -> bool {
        self.path_of(page).is_file()
    }

    fn read(&self, page: &str) -> io::Result<String> {
        let bytes = fs::read(self.path_of(page))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Pages held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageSource {
    /// Page bodies keyed by path.
    pages: BTreeMap<String, String>,
}

impl MemoryPageSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page.
    pub fn with_page(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(path.into(), body.into());
        self
    }

    /// Adds or replaces a page.
    pub fn insert(&mut self, path: impl Into<String>, body: impl Into<String>) {
        self.pages.insert(path.into(), body.into());
    }
}

impl PageSource for MemoryPageSource {
    fn exists(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    fn read(&self, page: &str) -> io::Result<String> {
        self.pages
            .get(page)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, page.to_string()))
    }
}
