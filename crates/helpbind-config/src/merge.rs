//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use std::path::{Path, PathBuf};

use crate::{
    BundleSettings, Config, ExcludeSettings, OnlineSettings, OutputSettings,
    parse::{
        RawBundleSettings, RawConfig, RawExcludeSettings, RawOnlineSettings, RawOutputSettings,
    },
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar and list settings: first defined value wins (highest precedence)
/// - Subfolders: merged by key over the defaults, first definition for each key wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut config = Config::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(bundle) = &raw.bundle {
            apply_raw_bundle(&mut config.bundle, bundle);
        }
        if let Some(online) = &raw.online {
            apply_raw_online(&mut config.online, online);
        }
        if let Some(exclude) = &raw.exclude {
            apply_raw_exclude(&mut config.exclude, exclude);
        }
        if let Some(subfolders) = &raw.subfolders {
            for (dir, sub) in subfolders {
                config.subfolders.insert(dir.clone(), sub.clone());
            }
        }
        if let Some(output) = &raw.output {
            apply_raw_output(&mut config.output, output);
        }
    }

    config.config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);
    config
}

/// Applies raw bundle settings, overwriting any present values.
fn apply_raw_bundle(result: &mut BundleSettings, raw: &RawBundleSettings) {
    if let Some(v) = &raw.family {
        result.family = Some(v.clone());
    }
    if let Some(v) = &raw.site_dir {
        result.site_dir = Some(v.clone());
    }
    if let Some(v) = &raw.subfolder {
        result.subfolder = Some(v.clone());
    }
    if let Some(v) = &raw.assets_dir {
        result.assets_dir = Some(v.clone());
    }
    if let Some(v) = &raw.page_extension {
        result.page_extension = v.trim_start_matches('.').to_string();
    }
}

/// Applies raw online settings, overwriting any present values.
fn apply_raw_online(result: &mut OnlineSettings, raw: &RawOnlineSettings) {
    if let Some(v) = raw.enabled {
        result.enabled = Some(v);
    }
    if let Some(v) = &raw.base_url {
        result.base_url = Some(v.clone());
    }
    if let Some(v) = &raw.online_extension {
        result.online_extension = v.trim_start_matches('.').to_string();
    }
    if let Some(v) = &raw.license_product {
        result.license_product = v.clone();
    }
    if let Some(v) = raw.decorate_headings {
        result.decorate_headings = v;
    }
}

/// Applies raw exclude settings, overwriting any present values.
fn apply_raw_exclude(result: &mut ExcludeSettings, raw: &RawExcludeSettings) {
    if let Some(v) = &raw.basenames {
        result.basenames = v.clone();
    }
    if let Some(v) = &raw.path_contains {
        result.path_contains = v.clone();
    }
    if let Some(v) = &raw.patterns {
        result.patterns = v.clone();
    }
    if let Some(v) = raw.shared_navigation {
        result.shared_navigation = v;
    }
}

/// Applies raw output settings, overwriting any present values.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = &raw.anchor_map {
        result.anchor_map = v.clone();
    }
    if let Some(v) = &raw.unresolved_report {
        result.unresolved_report = v.clone();
    }
    if let Some(v) = &raw.missing_report {
        result.missing_report = v.clone();
    }
    if let Some(v) = raw.external_variant {
        result.external_variant = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_config;

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config(toml).unwrap(),
        }
    }

    #[test]
    fn test_empty_merge_is_default() {
        let config = merge_configs(&[]);
        assert_eq!(config.bundle.page_extension, "md");
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_closest_wins_per_field() {
        let local = parsed(
            "/work/bundle/.helpbind.toml",
            "[bundle]\nsite_dir = \"Local_Documentation\"\n",
        );
        let global = parsed(
            "/home/u/.helpbind.toml",
            "[bundle]\nsite_dir = \"Global\"\npage_extension = \".markdown\"\n\n\
             [online]\nbase_url = \"https://docs.example.com\"\n",
        );
        let config = merge_configs(&[local, global]);

        assert_eq!(config.bundle.site_dir.as_deref(), Some("Local_Documentation"));
        assert_eq!(config.bundle.page_extension, "markdown");
        assert_eq!(
            config.online.base_url.as_deref(),
            Some("https://docs.example.com")
        );
        assert_eq!(config.config_root, Some(PathBuf::from("/work/bundle")));
    }

    #[test]
    fn test_subfolders_merge_over_defaults() {
        let local = parsed("/a/.helpbind.toml", "[subfolders]\nIDOLExpert = \"idolexpert\"\n");
        let global = parsed("/b/.helpbind.toml", "[subfolders]\nConnectors = \"connectors\"\n");
        let config = merge_configs(&[local, global]);

        assert_eq!(config.subfolders["IDOLExpert"], "idolexpert");
        assert_eq!(config.subfolders["Connectors"], "connectors");
        assert_eq!(config.subfolders["GettingStarted"], "gettingstarted");
    }

    #[test]
    fn test_exclude_lists_replace_not_append() {
        let local = parsed("/a/.helpbind.toml", "[exclude]\nbasenames = \"cover\"\n");
        let global = parsed(
            "/b/.helpbind.toml",
            "[exclude]\nbasenames = [\"a\", \"b\"]\nshared_navigation = false\n",
        );
        let config = merge_configs(&[local, global]);
        assert_eq!(config.exclude.basenames, vec!["cover"]);
        assert!(!config.exclude.shared_navigation);
    }

    #[test]
    fn test_output_settings() {
        let config = merge_configs(&[parsed(
            "/a/.helpbind.toml",
            "[output]\nexternal_variant = true\nmissing_report = \"missing.txt\"\n",
        )]);
        assert!(config.output.external_variant);
        assert_eq!(config.output.missing_report, "missing.txt");
        assert_eq!(config.output.unresolved_report, "unresolved_links.txt");
    }
}
