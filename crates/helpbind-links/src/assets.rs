//! Gathering referenced images into one folder.
//!
//! Pages reference images relative to their own directory. After assembly those references
//! are only meaningful with the page's directory in mind, so every image is copied into a
//! single assets folder and its reference rewritten to `{assets}/{name}`. Distinct files
//! sharing a name get `_1`, `_2`, ... suffixes.

use std::{
    collections::{HashMap, HashSet},
    fmt, fs,
    ops::Range,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use helpbind_document::{block_index_at, split_blocks};
use log::{debug, info, warn};
use regex::Regex;

use crate::{
    error::LinkError,
    resolve::join_relative,
    scan::{decode_target, is_external, line_at},
};

/// Matches a Markdown image; group 1 is the source.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[[^\]]*\]\(\s*<?([^()\s<>]+)>?(?:\s+["'][^"']*["'])?\s*\)"#)
        .expect("image pattern is valid")
});

/// Finds image files referenced by pages.
pub trait AssetLocator {
    /// Returns the file behind a bundle-relative path, if it exists.
    fn locate(&self, path: &str) -> Option<PathBuf>;
}

/// Looks images up under one or more directories, in order.
#[derive(Debug, Clone, Default)]
pub struct FsAssetLocator {
    /// Directories searched.
    roots: Vec<PathBuf>,
}

impl FsAssetLocator {
    /// Creates a locator searching `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            roots: vec![root.into()],
        }
    }

    /// Adds another directory to search after the existing ones.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }
}

impl AssetLocator for FsAssetLocator {
    fn locate(&self, path: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
    }
}

/// An image reference that could not be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    /// Page holding the reference.
    pub page: Option<String>,
    /// The source as written.
    pub source: String,
    /// Line of the reference.
    pub line: usize,
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page.as_deref().unwrap_or("-");
        write!(f, "{page}:{}: {}", self.line, self.source)
    }
}

/// The document with unified image references.
#[derive(Debug, Clone, Default)]
pub struct UnifiedAssets {
    /// Rewritten document.
    pub document: String,
    /// Files copied, with the name each received.
    pub copied: Vec<(PathBuf, String)>,
    /// References left as written.
    pub missing: Vec<MissingAsset>,
}

/// Picks collision-free names in the assets folder.
#[derive(Debug, Default)]
struct NameTable {
    /// Name given to each source file.
    assigned: HashMap<PathBuf, String>,
    /// Names in use.
    taken: HashSet<String>,
}

impl NameTable {
    /// Returns the name for `source` and whether it is new.
    fn name_for(&mut self, source: &Path) -> (String, bool) {
        if let Some(name) = self.assigned.get(source) {
            return (name.clone(), false);
        }
        let file_name = source
            .file_name()
            .map_or_else(|| "asset".to_string(), |n| n.to_string_lossy().into_owned());
        let (stem, ext) = match file_name.rfind('.') {
            Some(dot) if dot > 0 => (&file_name[..dot], &file_name[dot..]),
            _ => (file_name.as_str(), ""),
        };

        let mut name = file_name.clone();
        let mut n = 0;
        while self.taken.contains(&name) {
            n += 1;
            name = format!("{stem}_{n}{ext}");
        }
        self.taken.insert(name.clone());
        self.assigned.insert(source.to_path_buf(), name.clone());
        (name, true)
    }
}

/// Copies images into one folder and rewrites their references.
pub struct AssetUnifier<'a> {
    /// Where images are found.
    locator: &'a dyn AssetLocator,
    /// Folder images are copied into.
    target_dir: PathBuf,
    /// Prefix written in front of rewritten references.
    reference_prefix: String,
}

impl<'a> AssetUnifier<'a> {
    /// Creates a unifier copying into `target_dir`, referenced as `reference_prefix/name`.
    pub fn new(
        locator: &'a dyn AssetLocator,
        target_dir: impl Into<PathBuf>,
        reference_prefix: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            target_dir: target_dir.into(),
            reference_prefix: reference_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Finds the file behind image `source` written in a page under `dir`.
    fn find(&self, dir: &str, source: &str) -> Option<PathBuf> {
        let decoded = decode_target(source);
        let joined = join_relative(dir, &decoded);
        let climbed = decoded
            .trim_start_matches("./")
            .trim_start_matches("../")
            .to_string();
        joined
            .into_iter()
            .chain([climbed])
            .find_map(|candidate| self.locator.locate(&candidate))
    }

    /// Unifies every image reference in an assembled document.
    ///
    /// Missing images are logged and left unchanged; a failed copy is an error.
    pub fn unify(&self, document: &str) -> Result<UnifiedAssets, LinkError> {
        let blocks = split_blocks(document);
        let mut names = NameTable::default();
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        let mut result = UnifiedAssets::default();
        let mut created_dir = false;

        for caps in IMAGE_RE.captures_iter(document) {
            let Some(source) = caps.get(1) else { continue };
            if is_external(source.as_str()) {
                continue;
            }
            let page = block_index_at(&blocks, source.start()).and_then(|i| blocks[i].page);
            let dir = page
                .and_then(|p| p.rfind('/').map(|slash| &p[..=slash]))
                .unwrap_or("");

            let Some(file) = self.find(dir, source.as_str()) else {
                let missing = MissingAsset {
                    page: page.map(str::to_string),
                    source: source.as_str().to_string(),
                    line: line_at(document, source.start()),
                };
                warn!("image not found: {missing}");
                result.missing.push(missing);
                continue;
            };

            let (name, is_new) = names.name_for(&file);
            if is_new {
                if !created_dir {
                    fs::create_dir_all(&self.target_dir).map_err(|err| LinkError::WriteFile {
                        path: self.target_dir.clone(),
                        source: err,
                    })?;
                    created_dir = true;
                }
                let to = self.target_dir.join(&name);
                fs::copy(&file, &to).map_err(|err| LinkError::CopyAsset {
                    from: file.clone(),
                    to: to.clone(),
                    source: err,
                })?;
                debug!("copied {} to {}", file.display(), to.display());
                result.copied.push((file, name.clone()));
            }
            edits.push((source.range(), format!("{}/{name}", self.reference_prefix)));
        }

        let mut out = document.to_string();
        for (range, text) in edits.into_iter().rev() {
            out.replace_range(range, &text);
        }
        info!(
            "unified {} images ({} missing)",
            result.copied.len(),
            result.missing.len()
        );
        result.document = out;
        Ok(result)
    }
}
