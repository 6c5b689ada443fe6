//! Documentation families.
//!
//! A bundle is either a standalone help system published under `{site}/Help/`, or one guide of
//! a merged multi-guide package published under `{site}/Guides/html/{guide}/`. The family
//! decides both the path-normalization rules and the URL shape.

use std::{fmt, path::Path};

/// Site identifiers containing this marker belong to merged multi-guide packages.
const MERGED_SITE_MARKER: &str = "IDOLServer";

/// Guide folders of a merged package.
pub const GUIDE_SUBFOLDERS: [&str; 3] = ["expert", "gettingstarted", "documentsecurity"];

/// Layout convention of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocFamily {
    /// Standalone help system.
    #[default]
    Standard,
    /// One guide of a merged multi-guide package.
    MergedMultiGuide,
}

impl DocFamily {
    /// Classifies a bundle by its site identifier.
    pub fn from_site_dir(site_dir: &str) -> Self {
        if site_dir.contains(MERGED_SITE_MARKER) {
            Self::MergedMultiGuide
        } else {
            Self::Standard
        }
    }

    /// Classifies an extracted documentation root by its directory layout.
    ///
    /// `Guides/html/` with at least two known guide folders, each holding `Content/`, is a
    /// merged package; `Help/Content/` is a standalone bundle. Returns `None` for anything
    /// else.
    pub fn detect(root: &Path) -> Option<Self> {
        let guides = root.join("Guides").join("html");
        if guides.is_dir() {
            let present: Vec<&str> = GUIDE_SUBFOLDERS
                .iter()
                .copied()
                .filter(|guide| guides.join(guide).is_dir())
                .collect();
            let complete = present
                .iter()
                .all(|guide| guides.join(guide).join("Content").is_dir());
            if present.len() >= 2 && complete {
                return Some(Self::MergedMultiGuide);
            }
        }

        root.join("Help")
            .join("Content")
            .is_dir()
            .then_some(Self::Standard)
    }

    /// Short name used in configuration files and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MergedMultiGuide => "merged-multi-guide",
        }
    }
}

impl fmt::Display for DocFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn from_site_dir_hint() {
        assert_eq!(
            DocFamily::from_site_dir("IDOLServer_25.4_Documentation"),
            DocFamily::MergedMultiGuide
        );
        assert_eq!(
            DocFamily::from_site_dir("Content_25.4_Documentation"),
            DocFamily::Standard
        );
        assert_eq!(DocFamily::from_site_dir(""), DocFamily::Standard);
    }

    #[test]
    fn detect_merged_layout() {
        let dir = tempfile::tempdir().unwrap();
        for guide in ["expert", "gettingstarted"] {
            fs::create_dir_all(dir.path().join("Guides/html").join(guide).join("Content")).unwrap();
        }
        assert_eq!(
            DocFamily::detect(dir.path()),
            Some(DocFamily::MergedMultiGuide)
        );
    }

    #[test]
    fn detect_requires_content_in_every_guide() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Guides/html/expert/Content")).unwrap();
        fs::create_dir_all(dir.path().join("Guides/html/gettingstarted")).unwrap();
        assert_eq!(DocFamily::detect(dir.path()), None);
    }

    #[test]
    fn detect_standard_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Help/Content")).unwrap();
        assert_eq!(DocFamily::detect(dir.path()), Some(DocFamily::Standard));
    }

    #[test]
    fn display() {
        assert_eq!(DocFamily::MergedMultiGuide.to_string(), "merged-multi-guide");
    }
}
