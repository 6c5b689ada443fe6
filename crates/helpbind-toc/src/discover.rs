//! Locating and loading a bundle's TOC definitions.
//!
//! Definitions live in `Data/Tocs/`. A file whose name contains `_Chunk` belongs to the
//! hierarchy named by the part before `_Chunk`; every other `.js` file is a hierarchy.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    chunk::IdTable,
    define::parse_definition,
    error::TocError,
    hierarchy::{TocNode, build_tree},
    value::Value,
};

/// Directory of TOC definitions, relative to a bundle root.
pub const TOC_DIR: [&str; 2] = ["Data", "Tocs"];

/// Marker separating a hierarchy name from a chunk suffix.
const CHUNK_MARKER: &str = "_Chunk";

/// A hierarchy document and the chunk documents that belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocPair {
    /// Hierarchy name (file stem of the hierarchy document).
    pub name: String,
    /// Path to the hierarchy document.
    pub hierarchy: PathBuf,
    /// Paths to the chunk documents, sorted.
    pub chunks: Vec<PathBuf>,
}

/// A bundle's parsed table of contents.
#[derive(Debug, Default)]
pub struct LoadedToc {
    /// Root nodes of every hierarchy, in hierarchy-name order.
    pub roots: Vec<TocNode>,
    /// The merged id table.
    pub table: IdTable,
    /// Documents that were skipped.
    pub skipped: Vec<TocError>,
}

/// Returns the TOC directory of a bundle.
pub fn toc_dir(bundle_root: &Path) -> PathBuf {
    TOC_DIR
        .iter()
        .fold(bundle_root.to_path_buf(), |path, seg| path.join(seg))
}

/// Finds the hierarchy/chunk pairs of a bundle.
///
/// Groups with a hierarchy but no chunks, or chunks but no hierarchy, are logged and left out.
pub fn discover_pairs(bundle_root: &Path) -> Vec<TocPair> {
    let dir = toc_dir(bundle_root);
    let Ok(entries) = fs::read_dir(&dir) else {
        warn!("TOC directory {} not found", dir.display());
        return Vec::new();
    };

    let mut groups: BTreeMap<String, (Option<PathBuf>, Vec<PathBuf>)> = BTreeMap::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "js") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        match stem.split_once(CHUNK_MARKER) {
            Some((base, _)) => groups.entry(base.to_string()).or_default().1.push(path),
            None => groups.entry(stem).or_default().0 = Some(path),
        }
    }

    groups
        .into_iter()
        .filter_map(|(name, (hierarchy, mut chunks))| match hierarchy {
            Some(hierarchy) if !chunks.is_empty() => {
                chunks.sort();
                info!("found TOC pair {name} ({} chunks)", chunks.len());
                Some(TocPair {
                    name,
                    hierarchy,
                    chunks,
                })
            }
            _ => {
                warn!("hierarchy or chunk files missing for TOC {name}");
                None
            }
        })
        .collect()
}

/// Reads and parses one definition document.
pub fn read_definition(path: &Path) -> Result<Value, TocError> {
    let bytes = fs::read(path).map_err(|source| TocError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    parse_definition(&text)
        .map(|(value, _)| value)
        .map_err(|source| TocError::Unparsable {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads the TOC of a bundle.
///
/// All chunks of all pairs are merged into one id table before any hierarchy is built. A
/// document that cannot be read or parsed is logged, recorded in [`LoadedToc::skipped`], and
/// does not stop the others. Fails only when the bundle has no TOC pair at all.
pub fn load_bundle(bundle_root: &Path) -> Result<LoadedToc, TocError> {
    let pairs = discover_pairs(bundle_root);
    if pairs.is_empty() {
        return Err(TocError::MissingHierarchy {
            path: toc_dir(bundle_root),
        });
    }
    Ok(load_pairs(&pairs))
}

/// Loads the given pairs.
pub fn load_pairs(pairs: &[TocPair]) -> LoadedToc {
    let mut loaded = LoadedToc::default();

    for chunk_path in pairs.iter().flat_map(|pair| &pair.chunks) {
        let merged = read_definition(chunk_path).and_then(|chunk| {
            loaded
                .table
                .merge_chunk(&chunk)
                .map_err(|message| TocError::Structure {
                    path: chunk_path.clone(),
                    message: message.to_string(),
                })
        });
        if let Err(err) = merged {
            warn!("{err}");
            loaded.skipped.push(err);
        }
    }

    for pair in pairs {
        let built = read_definition(&pair.hierarchy).and_then(|doc| {
            build_tree(&doc, &loaded.table).map_err(|message| TocError::Structure {
                path: pair.hierarchy.clone(),
                message: message.to_string(),
            })
        });
        match built {
            Ok(roots) => loaded.roots.extend(roots),
            Err(err) => {
                warn!("{err}");
                loaded.skipped.push(err);
            }
        }
    }

    loaded
}
