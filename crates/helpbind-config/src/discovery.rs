//! Configuration file discovery.
//!
//! Discovers `.helpbind.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.helpbind.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".helpbind.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.helpbind.toml`)
/// last. Walking stops at a file with `root = true`, in which case the global file is not
/// consulted either.
///
/// Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    discover_with_global(cwd, global_config_path().as_deref())
}

/// Discovery against an explicit global file location.
fn discover_with_global(cwd: &Path, global: Option<&Path>) -> Vec<PathBuf> {
    let mut configs: Vec<PathBuf> = Vec::new();
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        debug!("found config file {}", candidate.display());
        let stops = is_root_config(&candidate);
        configs.push(candidate);
        if stops {
            debug!("stopping config discovery at root = true in {}", dir.display());
            return configs;
        }
    }

    match global {
        Some(global) if configs.iter().any(|c| c == global) => {
            debug!("global config {} already found while walking up", global.display());
        }
        Some(global) if global.is_file() => {
            debug!("found global config file {}", global.display());
            configs.push(global.to_path_buf());
        }
        _ => {}
    }
    configs
}

/// Returns the path to the global configuration file (`~/.helpbind.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
