//! Page exclusion rules.
//!
//! Compiles the `[exclude]` section into a matcher consulted for every page the TOC names.

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::{ConfigError, ExcludeSettings};

/// Basename prefix of the shared side navigation pages.
const SIDE_NAV_PREFIX: &str = "_ft_sidenav";

/// Basenames of cover and context-sensitive-help landing pages.
const COVER_STEMS: [&str; 2] = ["index", "index_csh"];

/// Directory holding shared navigation resources.
const RESOURCES_DIR: &str = "Resources/";

/// Why a page was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Listed in `basenames`.
    Basename,
    /// Path contains one of `path_contains`.
    PathContains,
    /// Matched one of `patterns`.
    Pattern,
    /// Shared navigation or cover page.
    SharedNavigation,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basename => "excluded basename",
            Self::PathContains => "excluded path fragment",
            Self::Pattern => "excluded pattern",
            Self::SharedNavigation => "shared navigation",
        })
    }
}

/// Compiled exclusion rules.
#[derive(Debug, Clone)]
pub struct Exclusions {
    /// Lowercased basenames as written, paired with their stems.
    basenames: Vec<(String, String)>,
    /// Path substrings.
    path_contains: Vec<String>,
    /// Compiled glob patterns.
    patterns: GlobSet,
    /// Whether the shared-navigation heuristic applies.
    shared_navigation: bool,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            basenames: Vec::new(),
            path_contains: Vec::new(),
            patterns: GlobSet::empty(),
            shared_navigation: false,
        }
    }
}

impl Exclusions {
    /// Compiles exclusion settings into a matcher.
    pub fn compile(settings: &ExcludeSettings) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.patterns {
            builder.add(compile_glob(pattern)?);
        }
        let patterns = builder
            .build()
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: String::from("<combined exclude patterns>"),
                source: e,
            })?;

        Ok(Self {
            basenames: settings
                .basenames
                .iter()
                .map(|b| {
                    let name = b.to_ascii_lowercase();
                    let (_, stem) = name_and_stem(&name);
                    let stem = stem.to_string();
                    (name, stem)
                })
                .collect(),
            path_contains: settings.path_contains.clone(),
            patterns,
            shared_navigation: settings.shared_navigation,
        })
    }

    /// Returns the first rule excluding `page`, a bundle-relative page path.
    ///
    /// Basenames match on the stem, so `Cover.htm` in the config excludes `Content/cover.md`.
    pub fn matched(&self, page: &str) -> Option<Exclusion> {
        let (name, stem) = name_and_stem(page);
        let name = name.to_ascii_lowercase();
        let stem = stem.to_ascii_lowercase();

        if self
            .basenames
            .iter()
            .any(|(full, base)| *full == name || *full == stem || *base == stem)
        {
            Some(Exclusion::Basename)
        } else if self.path_contains.iter().any(|s| page.contains(s.as_str())) {
            Some(Exclusion::PathContains)
        } else if self.patterns.is_match(page) {
            Some(Exclusion::Pattern)
        } else if self.shared_navigation && is_shared_navigation(page) {
            Some(Exclusion::SharedNavigation)
        } else {
            None
        }
    }

    /// Returns true if any rule excludes `page`.
    pub fn is_excluded(&self, page: &str) -> bool {
        self.matched(page).is_some()
    }
}

/// Returns true for shared navigation and cover pages.
///
/// These are pages whose basename starts with `_FT_SideNav`, whose stem is `index` or
/// `index_CSH`, or which live under a `Resources/` directory.
pub fn is_shared_navigation(page: &str) -> bool {
    let (_, stem) = name_and_stem(page);
    let stem = stem.to_ascii_lowercase();
    stem.starts_with(SIDE_NAV_PREFIX)
        || COVER_STEMS.contains(&stem.as_str())
        || page.starts_with(RESOURCES_DIR)
        || page.contains(&format!("/{RESOURCES_DIR}"))
}

/// Splits the last path segment into its full name and its stem.
fn name_and_stem(page: &str) -> (&str, &str) {
    let name = page.rsplit('/').next().unwrap_or(page);
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    (name, stem)
}

/// Compiles a single glob pattern.
fn compile_glob(pattern: &str) -> Result<Glob, ConfigError> {
    Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(basenames: &[&str], path_contains: &[&str], patterns: &[&str]) -> ExcludeSettings {
        ExcludeSettings {
            basenames: basenames.iter().map(|s| (*s).to_string()).collect(),
            path_contains: path_contains.iter().map(|s| (*s).to_string()).collect(),
            patterns: patterns.iter().map(|s| (*s).to_string()).collect(),
            shared_navigation: true,
        }
    }

    #[test]
    fn shared_navigation_heuristic() {
        assert!(is_shared_navigation("Content/_FT_SideNav_Startup.md"));
        assert!(is_shared_navigation("index.md"));
        assert!(is_shared_navigation("Content/index_CSH.md"));
        assert!(is_shared_navigation("Resources/Snippets/Note.md"));
        assert!(is_shared_navigation("Content/Resources/Cover.md"));
        assert!(!is_shared_navigation("Content/Indexing/indexes.md"));
        assert!(!is_shared_navigation("Content/MyResources/a.md"));
    }

    #[test]
    fn rules_in_order() {
        let exclusions =
            Exclusions::compile(&settings(&["Cover.htm", "legal"], &["/Drafts/"], &["**/*_old.md"]))
                .unwrap();
        assert_eq!(exclusions.matched("Content/cover.md"), Some(Exclusion::Basename));
        assert_eq!(exclusions.matched("Content/Legal.md"), Some(Exclusion::Basename));
        assert_eq!(
            exclusions.matched("Content/Drafts/a.md"),
            Some(Exclusion::PathContains)
        );
        assert_eq!(
            exclusions.matched("Content/Guide/setup_old.md"),
            Some(Exclusion::Pattern)
        );
        assert_eq!(
            exclusions.matched("Content/index.md"),
            Some(Exclusion::SharedNavigation)
        );
        assert_eq!(exclusions.matched("Content/Guide/setup.md"), None);
    }

    #[test]
    fn basenames_match_across_extensions() {
        let exclusions =
            Exclusions::compile(&settings(&["Cover.htm", "v1.2", "Notes.md"], &[], &[])).unwrap();
        assert_eq!(exclusions.matched("Content/COVER.md"), Some(Exclusion::Basename));
        assert_eq!(exclusions.matched("Content/cover.htm"), Some(Exclusion::Basename));
        assert_eq!(exclusions.matched("Content/v1.2.md"), Some(Exclusion::Basename));
        assert_eq!(exclusions.matched("Content/notes.md"), Some(Exclusion::Basename));
        assert_eq!(exclusions.matched("Content/covers.md"), None);
    }

    #[test]
    fn shared_navigation_can_be_disabled() {
        let mut s = settings(&[], &[], &[]);
        s.shared_navigation = false;
        let exclusions = Exclusions::compile(&s).unwrap();
        assert!(!exclusions.is_excluded("index.md"));
        assert!(!Exclusions::default().is_excluded("index.md"));
    }

    #[test]
    fn invalid_glob_is_error() {
        let err = Exclusions::compile(&settings(&[], &[], &["Content/[a-"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { pattern, .. } if pattern == "Content/[a-"));
    }
}
