//! Configuration system for helpbind.
//!
//! helpbind uses TOML configuration files named `.helpbind.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.helpbind.toml` files found, then loading `~/.helpbind.toml` as the global config with
//! lowest precedence. The closest file wins for each field.

#![warn(missing_docs)]

mod discovery;
mod error;
mod exclude;
mod merge;
mod parse;
mod templates;
mod validate;

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use exclude::{Exclusion, Exclusions, is_shared_navigation};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawBundleSettings, RawConfig, RawExcludeSettings, RawOnlineSettings, RawOutputSettings,
    parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Guide subfolders of the merged family, keyed by first `Content/` directory.
pub const DEFAULT_SUBFOLDERS: [(&str, &str); 4] = [
    ("IDOLExpert", "expert"),
    ("GettingStarted", "gettingstarted"),
    ("OmniGroupServer", "documentsecurity"),
    ("DocumentSecurity", "documentsecurity"),
];

/// Top-level merged configuration for helpbind.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Bundle layout settings.
    pub bundle: BundleSettings,
    /// Online link settings.
    pub online: OnlineSettings,
    /// Page exclusion settings.
    pub exclude: ExcludeSettings,
    /// Content directory -> guide subfolder.
    pub subfolders: BTreeMap<String, String>,
    /// Output file names.
    pub output: OutputSettings,
    /// Directory containing the most specific config file.
    #[serde(skip)]
    pub config_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bundle: BundleSettings::default(),
            online: OnlineSettings::default(),
            exclude: ExcludeSettings::default(),
            subfolders: DEFAULT_SUBFOLDERS
                .iter()
                .map(|(dir, sub)| ((*dir).to_string(), (*sub).to_string()))
                .collect(),
            output: OutputSettings::default(),
            config_root: None,
        }
    }
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.helpbind.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Returns the configured documentation family.
    pub fn family(&self) -> Result<FamilyChoice, ConfigError> {
        match self.bundle.family.as_deref() {
            None => Ok(FamilyChoice::Auto),
            Some(value) => {
                FamilyChoice::parse(value).ok_or_else(|| ConfigError::InvalidFamily {
                    value: value.to_string(),
                })
            }
        }
    }

    /// Whether online links are produced: explicitly, or implied by a base URL.
    pub fn online_enabled(&self) -> bool {
        self.online
            .enabled
            .unwrap_or(self.online.base_url.is_some())
    }

    /// Returns the base URL when online links are enabled.
    ///
    /// Explicitly enabling online links without a base URL is an error.
    pub fn online_base_url(&self) -> Result<Option<&str>, ConfigError> {
        if !self.online_enabled() {
            return Ok(None);
        }
        self.online
            .base_url
            .as_deref()
            .map(|url| Some(url.trim_end_matches('/')))
            .ok_or(ConfigError::MissingOnlineSettings {
                field: "online.base_url",
            })
    }

    /// Folder images are gathered into: the configured one, `{site_dir}_assets`, or `assets`.
    pub fn assets_dir(&self, site_dir: Option<&str>) -> String {
        if let Some(dir) = &self.bundle.assets_dir {
            return dir.clone();
        }
        site_dir
            .or(self.bundle.site_dir.as_deref())
            .map_or_else(|| "assets".to_string(), |site| format!("{site}_assets"))
    }

    /// Compiles the page exclusion rules.
    pub fn compile_exclusions(&self) -> Result<Exclusions, ConfigError> {
        Exclusions::compile(&self.exclude)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective configuration to TOML, in `.helpbind.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|source| ConfigError::SerializeToml { source })
    }
}

/// The documentation family a bundle is declared to belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FamilyChoice {
    /// Detect the family from the site identifier and layout.
    #[default]
    Auto,
    /// One product per site, pages under `Help/`.
    Standard,
    /// Several guides merged into one site under `Guides/html/{guide}/`.
    MergedMultiGuide,
}

impl FamilyChoice {
    /// Parses a family name as written in configuration or on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "standard" => Some(Self::Standard),
            "merged-multi-guide" | "merged" => Some(Self::MergedMultiGuide),
            _ => None,
        }
    }
}

impl fmt::Display for FamilyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Standard => "standard",
            Self::MergedMultiGuide => "merged-multi-guide",
        })
    }
}

/// Bundle layout settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BundleSettings {
    /// Documentation family; detected when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Published site directory, e.g. `Content_25.4_Documentation`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_dir: Option<String>,
    /// Guide subfolder of a merged site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<String>,
    /// Folder images are gathered into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<String>,
    /// Extension of converted page bodies.
    pub page_extension: String,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            family: None,
            site_dir: None,
            subfolder: None,
            assets_dir: None,
            page_extension: String::from("md"),
        }
    }
}

/// Online link settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OnlineSettings {
    /// Whether to produce online links; implied by `base_url` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Base URL of the documentation host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Extension of published pages.
    pub online_extension: String,
    /// Product whose site hosts the shared licensing pages.
    pub license_product: String,
    /// Whether to append view-online links to first headings.
    pub decorate_headings: bool,
}

impl Default for OnlineSettings {
    fn default() -> Self {
        Self {
            enabled: None,
            base_url: None,
            online_extension: String::from("htm"),
            license_product: String::from("LicenseServer"),
            decorate_headings: true,
        }
    }
}

/// Page exclusion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExcludeSettings {
    /// Page file names (with or without extension) to leave out.
    pub basenames: Vec<String>,
    /// Substrings that exclude any page path containing them.
    pub path_contains: Vec<String>,
    /// Glob patterns matched against page paths.
    pub patterns: Vec<String>,
    /// Whether to leave out shared navigation and cover pages.
    pub shared_navigation: bool,
}

impl Default for ExcludeSettings {
    fn default() -> Self {
        Self {
            basenames: Vec::new(),
            path_contains: Vec::new(),
            patterns: Vec::new(),
            shared_navigation: true,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Anchor map file name.
    pub anchor_map: String,
    /// Unresolved-links report file name.
    pub unresolved_report: String,
    /// Missing-anchors report file name.
    pub missing_report: String,
    /// Whether to also write the external-links variant.
    pub external_variant: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            anchor_map: String::from("__anchors.json"),
            unresolved_report: String::from("unresolved_links.txt"),
            missing_report: String::from("missing_anchors.txt"),
            external_variant: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bundle.page_extension, "md");
        assert_eq!(config.online.online_extension, "htm");
        assert_eq!(config.online.license_product, "LicenseServer");
        assert!(config.online.decorate_headings);
        assert!(config.exclude.shared_navigation);
        assert_eq!(config.subfolders["IDOLExpert"], "expert");
        assert_eq!(config.subfolders.len(), 4);
        assert_eq!(config.output.anchor_map, "__anchors.json");
        assert!(!config.output.external_variant);
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_family_parse() {
        assert_eq!(FamilyChoice::parse("Standard"), Some(FamilyChoice::Standard));
        assert_eq!(
            FamilyChoice::parse("merged-multi-guide"),
            Some(FamilyChoice::MergedMultiGuide)
        );
        assert_eq!(FamilyChoice::parse("auto"), Some(FamilyChoice::Auto));
        assert_eq!(FamilyChoice::parse("wiki"), None);

        let mut config = Config::default();
        assert_eq!(config.family().unwrap(), FamilyChoice::Auto);
        config.bundle.family = Some("wiki".into());
        assert!(matches!(
            config.family(),
            Err(ConfigError::InvalidFamily { value }) if value == "wiki"
        ));
    }

    #[test]
    fn test_online_enabled_follows_base_url() {
        let mut config = Config::default();
        assert!(!config.online_enabled());
        assert_eq!(config.online_base_url().unwrap(), None);

        config.online.base_url = Some("https://docs.example.com/".into());
        assert!(config.online_enabled());
        assert_eq!(
            config.online_base_url().unwrap(),
            Some("https://docs.example.com")
        );

        config.online.enabled = Some(false);
        assert_eq!(config.online_base_url().unwrap(), None);
    }

    #[test]
    fn test_enabled_without_base_url_is_error() {
        let mut config = Config::default();
        config.online.enabled = Some(true);
        assert!(matches!(
            config.online_base_url(),
            Err(ConfigError::MissingOnlineSettings {
                field: "online.base_url"
            })
        ));
    }

    #[test]
    fn test_assets_dir() {
        let mut config = Config::default();
        assert_eq!(config.assets_dir(None), "assets");
        assert_eq!(
            config.assets_dir(Some("Content_25.4_Documentation")),
            "Content_25.4_Documentation_assets"
        );
        config.bundle.assets_dir = Some("img".into());
        assert_eq!(config.assets_dir(Some("x")), "img");
    }

    #[test]
    fn test_settings_to_toml() {
        let toml = Config::default().settings_to_toml().unwrap();
        assert!(toml.contains("[bundle]"));
        assert!(toml.contains("[online]"));
        assert!(toml.contains("[exclude]"));
        assert!(toml.contains("[subfolders]"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("page_extension = \"md\""));
        assert!(!toml.contains("base_url"));

        let parsed: RawConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.subfolders.unwrap().len(), 4);
    }
}
