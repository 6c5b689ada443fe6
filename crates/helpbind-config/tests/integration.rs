//! Integration tests for helpbind-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> compile.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use helpbind_config::{
    CONFIG_FILENAME, Config, ConfigError, ConfigWarning, Exclusion, FamilyChoice,
    is_global_config,
};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    /// Temporary root.
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Writes a `.helpbind.toml` into `rel_dir` and returns its path.
    fn config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let dir = self.root.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

/// Loads from `dir`, ignoring whatever global config the machine has.
fn load_local(dir: &Path) -> Result<Config, ConfigError> {
    let files: Vec<PathBuf> = helpbind_config::discover_config_files(dir)
        .into_iter()
        .filter(|p| !is_global_config(p))
        .collect();
    Config::load_from_files(&files)
}

#[test]
fn test_load_no_config_returns_default() {
    let env = TestEnv::new();
    let config = load_local(env.path()).unwrap();
    assert!(config.config_root.is_none());
    assert_eq!(config.bundle.page_extension, "md");
    assert_eq!(config.family().unwrap(), FamilyChoice::Auto);
}

#[test]
fn test_nested_configs_merge_with_closest_winning() {
    let env = TestEnv::new();
    env.config(
        "",
        r#"
root = true

[online]
base_url = "https://docs.example.com"
license_product = "Licensing"

[exclude]
basenames = ["legal"]
"#,
    );
    env.config(
        "bundles/Content",
        r#"
[bundle]
family = "standard"
site_dir = "Content_25.4_Documentation"

[exclude]
path_contains = "/Drafts/"
"#,
    );

    let cwd = env.path().join("bundles/Content");
    let config = load_local(&cwd).unwrap();

    assert_eq!(config.config_root, Some(cwd));
    assert_eq!(config.family().unwrap(), FamilyChoice::Standard);
    assert_eq!(config.online_base_url().unwrap(), Some("https://docs.example.com"));
    assert_eq!(config.online.license_product, "Licensing");
    assert_eq!(config.assets_dir(None), "Content_25.4_Documentation_assets");
    assert!(config.validate().is_empty());

    let exclusions = config.compile_exclusions().unwrap();
    assert_eq!(exclusions.matched("Content/legal.md"), Some(Exclusion::Basename));
    assert_eq!(
        exclusions.matched("Content/Drafts/x.md"),
        Some(Exclusion::PathContains)
    );
    assert_eq!(
        exclusions.matched("Content/_FT_SideNav_Startup.md"),
        Some(Exclusion::SharedNavigation)
    );
    assert!(!exclusions.is_excluded("Content/Guide/setup.md"));
}

#[test]
fn test_parse_error_names_file() {
    let env = TestEnv::new();
    let path = env.config("", "root = true\n[bundle\n");
    let err = load_local(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bad_exclude_pattern_is_error() {
    let env = TestEnv::new();
    env.config("", "root = true\n[exclude]\npatterns = \"Content/{a\"\n");
    let config = load_local(env.path()).unwrap();
    assert!(matches!(
        config.compile_exclusions(),
        Err(ConfigError::InvalidPattern { .. })
    ));
}

#[test]
fn test_warnings_for_incomplete_online_setup() {
    let env = TestEnv::new();
    env.config(
        "",
        "root = true\n[bundle]\nfamily = \"merged\"\n[online]\nenabled = true\n",
    );
    let config = load_local(env.path()).unwrap();
    assert_eq!(config.family().unwrap(), FamilyChoice::MergedMultiGuide);
    assert_eq!(
        config.validate(),
        vec![
            ConfigWarning::OnlineWithoutBaseUrl,
            ConfigWarning::OnlineWithoutSiteDir
        ]
    );
    assert!(matches!(
        config.online_base_url(),
        Err(ConfigError::MissingOnlineSettings { .. })
    ));
}

#[test]
fn test_effective_config_round_trips_through_toml() {
    let env = TestEnv::new();
    env.config(
        "",
        "root = true\n[bundle]\nsite_dir = \"IDOLServer_25.4_Documentation\"\n\
         [subfolders]\nConnectors = \"connectors\"\n",
    );
    let config = load_local(env.path()).unwrap();
    let rendered = config.settings_to_toml().unwrap();

    let reparsed = env.config("again", &format!("root = true\n{rendered}"));
    let again = Config::load_from_files(&[reparsed]).unwrap();
    assert_eq!(again.bundle.site_dir, config.bundle.site_dir);
    assert_eq!(again.subfolders, config.subfolders);
    assert_eq!(again.output.anchor_map, config.output.anchor_map);
}
