//! Configuration file parsing.
//!
//! Parses individual `.helpbind.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Bundle layout section.
    pub bundle: Option<RawBundleSettings>,
    /// Online link section.
    pub online: Option<RawOnlineSettings>,
    /// Page exclusion section.
    pub exclude: Option<RawExcludeSettings>,
    /// Content directory -> guide subfolder.
    pub subfolders: Option<BTreeMap<String, String>>,
    /// Output file section.
    pub output: Option<RawOutputSettings>,
}

/// Raw `[bundle]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBundleSettings {
    /// Documentation family name.
    pub family: Option<String>,
    /// Published site directory.
    pub site_dir: Option<String>,
    /// Guide subfolder of a merged site.
    pub subfolder: Option<String>,
    /// Folder images are gathered into.
    pub assets_dir: Option<String>,
    /// Extension of converted page bodies.
    pub page_extension: Option<String>,
}

/// Raw `[online]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOnlineSettings {
    /// Whether to produce online links.
    pub enabled: Option<bool>,
    /// Base URL of the documentation host.
    pub base_url: Option<String>,
    /// Extension of published pages.
    pub online_extension: Option<String>,
    /// Product whose site hosts the shared licensing pages.
    pub license_product: Option<String>,
    /// Whether to append view-online links to first headings.
    pub decorate_headings: Option<bool>,
}

/// Raw `[exclude]` settings.
///
/// List fields accept either a single string or an array of strings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExcludeSettings {
    /// Page file names (with or without extension) to leave out.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub basenames: Option<Vec<String>>,
    /// Substrings that exclude any page path containing them.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub path_contains: Option<Vec<String>>,
    /// Glob patterns matched against page paths.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub patterns: Option<Vec<String>>,
    /// Whether to leave out shared navigation and cover pages.
    pub shared_navigation: Option<bool>,
}

/// Raw `[output]` settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    /// Anchor map file name.
    pub anchor_map: Option<String>,
    /// Unresolved-links report file name.
    pub unresolved_report: Option<String>,
    /// Missing-anchors report file name.
    pub missing_report: Option<String>,
    /// Whether to also write the external-links variant.
    pub external_variant: Option<bool>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.bundle.is_none());
        assert!(config.online.is_none());
        assert!(config.exclude.is_none());
        assert!(config.subfolders.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_parse_sections() {
        let toml = r#"
root = true

[bundle]
family = "merged-multi-guide"
site_dir = "IDOLServer_25.4_Documentation"

[online]
base_url = "https://docs.example.com"

[subfolders]
Connectors = "connectors"

[output]
external_variant = true
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.root, Some(true));
        let bundle = config.bundle.unwrap();
        assert_eq!(bundle.family.as_deref(), Some("merged-multi-guide"));
        assert!(bundle.subfolder.is_none());
        assert_eq!(
            config.online.unwrap().base_url.as_deref(),
            Some("https://docs.example.com")
        );
        assert_eq!(config.subfolders.unwrap()["Connectors"], "connectors");
        assert_eq!(config.output.unwrap().external_variant, Some(true));
    }

    #[test]
    fn test_exclude_accepts_one_or_many() {
        let toml = r#"
[exclude]
basenames = "index"
path_contains = ["/Drafts/", "/Old/"]
"#;
        let exclude = parse_config(toml).unwrap().exclude.unwrap();
        assert_eq!(exclude.basenames, Some(vec!["index".to_string()]));
        assert_eq!(exclude.path_contains.unwrap().len(), 2);
        assert!(exclude.patterns.is_none());
        assert!(exclude.shared_navigation.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config_str("[bundle\nfamily = 1", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_wrong_type_is_error() {
        let result = parse_config("[online]\nenabled = \"yes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root.toml");
        let plain = dir.path().join("plain.toml");
        let broken = dir.path().join("broken.toml");
        fs::write(&root, "root = true\n").unwrap();
        fs::write(&plain, "[bundle]\n").unwrap();
        fs::write(&broken, "root = \n").unwrap();

        assert!(is_root_config(&root));
        assert!(!is_root_config(&plain));
        assert!(!is_root_config(&broken));
        assert!(!is_root_config(&dir.path().join("absent.toml")));
    }
}
