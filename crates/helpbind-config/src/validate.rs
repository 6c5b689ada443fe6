//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::{Config, FamilyChoice};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `[bundle] family` names no known family.
    UnknownFamily {
        /// The value as written.
        value: String,
    },
    /// Online links are enabled but no base URL is set.
    OnlineWithoutBaseUrl,
    /// Online links are enabled but no site directory is set.
    OnlineWithoutSiteDir,
    /// Heading decoration is on while online links are off.
    DecorationWithoutOnline,
    /// The merged family is selected with no guide subfolder to place pages in.
    MergedWithoutSubfolder,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFamily { value } => {
                write!(f, "unknown documentation family '{value}'")
            }
            Self::OnlineWithoutBaseUrl => {
                write!(f, "online links are enabled but online.base_url is not set")
            }
            Self::OnlineWithoutSiteDir => {
                write!(
                    f,
                    "bundle.site_dir is not set, the bundle directory name will be used"
                )
            }
            Self::DecorationWithoutOnline => {
                write!(
                    f,
                    "online.decorate_headings has no effect without online.base_url"
                )
            }
            Self::MergedWithoutSubfolder => {
                write!(
                    f,
                    "merged-multi-guide family has no bundle.subfolder and no [subfolders] entries"
                )
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let family = config.family();
    if let (Err(_), Some(value)) = (&family, &config.bundle.family) {
        warnings.push(ConfigWarning::UnknownFamily {
            value: value.clone(),
        });
    }

    if config.online_enabled() {
        if config.online.base_url.is_none() {
            warnings.push(ConfigWarning::OnlineWithoutBaseUrl);
        }
        if config.bundle.site_dir.is_none() {
            warnings.push(ConfigWarning::OnlineWithoutSiteDir);
        }
    } else if config.online.enabled.is_none()
        && config.online.decorate_headings
        && config.bundle.site_dir.is_some()
    {
        warnings.push(ConfigWarning::DecorationWithoutOnline);
    }

    if matches!(family, Ok(FamilyChoice::MergedMultiGuide))
        && config.bundle.subfolder.is_none()
        && config.subfolders.is_empty()
    {
        warnings.push(ConfigWarning::MergedWithoutSubfolder);
    }

    warnings
}
