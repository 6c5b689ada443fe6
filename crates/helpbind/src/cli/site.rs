//! Online site settings assembled from configuration and command-line overrides.

use std::path::Path;

use helpbind_config::{Config, ConfigError, FamilyChoice};
use helpbind_links::{DocFamily, OnlineSite, PrefixSubfolders};
use log::debug;

use crate::cli::args::SiteArgs;

/// Where and how a bundle is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    /// Documentation family.
    pub family: DocFamily,
    /// Published site directory.
    pub site_dir: String,
    /// Guide subfolder of a merged site.
    pub subfolder: Option<String>,
    /// Base URL, when online links are produced.
    pub base_url: Option<String>,
}

impl SiteSettings {
    /// Combines command-line overrides, configuration and the bundle directory.
    ///
    /// Flags win over configuration. Without an explicit family the bundle layout is
    /// inspected, then the site identifier. `no_online` turns online links off entirely.
    pub fn resolve(
        config: &Config,
        args: &SiteArgs,
        bundle: Option<&Path>,
        no_online: bool,
    ) -> Result<Self, ConfigError> {
        let choice = match args.family.as_deref() {
            Some(value) => {
                FamilyChoice::parse(value).ok_or_else(|| ConfigError::InvalidFamily {
                    value: value.to_string(),
                })?
            }
            None => config.family()?,
        };

        let site_dir = args
            .site_dir
            .clone()
            .or_else(|| config.bundle.site_dir.clone())
            .or_else(|| bundle.and_then(directory_name))
            .unwrap_or_default();

        let family = match choice {
            FamilyChoice::Standard => DocFamily::Standard,
            FamilyChoice::MergedMultiGuide => DocFamily::MergedMultiGuide,
            FamilyChoice::Auto => bundle
                .and_then(DocFamily::detect)
                .unwrap_or_else(|| DocFamily::from_site_dir(&site_dir)),
        };

        let base_url = if no_online {
            None
        } else if let Some(url) = &args.base_url {
            Some(url.trim_end_matches('/').to_string())
        } else {
            config.online_base_url()?.map(str::to_string)
        };
        if base_url.is_some() && site_dir.is_empty() {
            return Err(ConfigError::MissingOnlineSettings {
                field: "bundle.site_dir",
            });
        }

        let settings = Self {
            family,
            site_dir,
            subfolder: args
                .subfolder
                .clone()
                .or_else(|| config.bundle.subfolder.clone()),
            base_url,
        };
        debug!("site settings: {settings:?}");
        Ok(settings)
    }

    /// Builds the online site description, if online links are on.
    pub fn online_site(&self, config: &Config) -> Option<OnlineSite> {
        let base_url = self.base_url.as_deref()?;
        let mut site = OnlineSite::new(base_url, &self.site_dir).with_family(self.family);
        if let Some(subfolder) = &self.subfolder {
            site = site.with_subfolder(subfolder);
        }
        site.license_product.clone_from(&config.online.license_product);
        site.extension.clone_from(&config.online.online_extension);
        Some(site)
    }
}

/// Guide inference table from the `[subfolders]` section.
pub fn subfolder_inference(config: &Config) -> PrefixSubfolders {
    PrefixSubfolders::new(&config.subfolders)
}

/// Final component of a directory, resolving `.` and `..` first.
pub fn directory_name(dir: &Path) -> Option<String> {
    let resolved = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
