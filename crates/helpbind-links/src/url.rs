//! Online URL construction.
//!
//! Standalone bundles publish under `{base}/{site}/Help/`, merged guides under
//! `{base}/{site}/Guides/html/{guide}/`. Pages from the shared administration tree live on the
//! license server's site whatever the family.

use helpbind_document::ViewOnline;
use log::debug;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{
    family::DocFamily,
    normalize::{normalize_target_path, strip_rel_and_ext},
};

/// Characters escaped inside one URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Trees served from the license server's site.
const LICENSE_TREE: &str = "Content/Shared_Admin/";

/// Default guide folder for each first directory under `Content/`.
const DEFAULT_SUBFOLDERS: [(&str, &str); 4] = [
    ("IDOLExpert", "expert"),
    ("GettingStarted", "gettingstarted"),
    ("OmniGroupServer", "documentsecurity"),
    ("DocumentSecurity", "documentsecurity"),
];

/// Infers which guide of a merged package a path belongs to.
pub trait SubfolderInference {
    /// Returns the guide folder hinted by `path`, if any.
    fn infer(&self, path: &str) -> Option<String>;
}

/// Infers the guide from the first directory under `Content/`.
#[derive(Debug, Clone)]
pub struct PrefixSubfolders {
    /// First directory → guide folder.
    prefixes: Vec<(String, String)>,
}

impl PrefixSubfolders {
    /// Creates an inference table from explicit pairs.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefixes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Default for PrefixSubfolders {
    fn default() -> Self {
        Self::new(DEFAULT_SUBFOLDERS)
    }
}

impl SubfolderInference for PrefixSubfolders {
    fn infer(&self, path: &str) -> Option<String> {
        let path = path.trim_start_matches('/');
        let rest = match path.get(..8) {
            Some(head) if head.eq_ignore_ascii_case("Content/") => &path[8..],
            _ => path,
        };
        let first = rest.split('/').next()?;
        // A bare file name has no directory to go by.
        if first.len() == rest.len() {
            return None;
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| prefix.eq_ignore_ascii_case(first))
            .map(|(_, subfolder)| subfolder.clone())
    }
}

/// Percent-encodes each `/`-separated segment of `path`.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Returns the license server's site identifier for `site_dir`.
///
/// The product name before the first `_` is replaced: `Content_25.4_Documentation` becomes
/// `LicenseServer_25.4_Documentation`.
pub fn license_site(site_dir: &str, license_product: &str) -> String {
    match site_dir.split_once('_') {
        Some((_, rest)) => format!("{license_product}_{rest}"),
        None => license_product.to_string(),
    }
}

/// Where a bundle is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineSite {
    /// Base URL of the documentation host.
    pub base_url: String,
    /// Site identifier of this bundle.
    pub site_dir: String,
    /// Layout convention.
    pub family: DocFamily,
    /// Guide folder of this bundle, used when nothing better can be inferred.
    pub subfolder: Option<String>,
    /// Product name of the license server's site.
    pub license_product: String,
    /// Extension of published pages, without the dot.
    pub extension: String,
}

impl OnlineSite {
    /// Creates a site description with the family taken from the site identifier.
    pub fn new(base_url: impl Into<String>, site_dir: impl Into<String>) -> Self {
        let site_dir = site_dir.into();
        Self {
            base_url: base_url.into(),
            family: DocFamily::from_site_dir(&site_dir),
            site_dir,
            subfolder: None,
            license_product: "LicenseServer".to_string(),
            extension: "htm".to_string(),
        }
    }

    /// Overrides the family.
    pub fn with_family(mut self, family: DocFamily) -> Self {
        self.family = family;
        self
    }

    /// Sets the bundle's guide folder.
    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = Some(subfolder.into());
        self
    }

    /// Builds the URL of a normalized path (without extension).
    ///
    /// `fragment` is appended as written. `subfolder` only matters for merged guides; its last
    /// segment names the guide folder.
    pub fn url(&self, normalized: &str, fragment: Option<&str>, subfolder: Option<&str>) -> String {
        let base = self.base_url.trim_end_matches('/');
        let file = if self.extension.is_empty() {
            normalized.to_string()
        } else {
            format!("{normalized}.{}", self.extension)
        };
        let path = encode_path(&file);
        let anchor = fragment.map(|f| format!("#{f}")).unwrap_or_default();

        if normalized.contains(LICENSE_TREE) {
            let site = license_site(self.site_dir.trim_matches('/'), &self.license_product);
            return format!("{base}/{}/Help/{path}{anchor}", encode_path(&site));
        }

        let site = encode_path(self.site_dir.trim_matches('/'));
        match self.family {
            DocFamily::Standard => format!("{base}/{site}/Help/{path}{anchor}"),
            DocFamily::MergedMultiGuide => {
                let guide = subfolder
                    .and_then(|s| s.trim_end_matches('/').rsplit('/').next())
                    .filter(|s| !s.is_empty());
                match guide {
                    Some(guide) => format!(
                        "{base}/{site}/Guides/html/{}/{path}{anchor}",
                        utf8_percent_encode(guide, SEGMENT)
                    ),
                    None => format!("{base}/{site}/Guides/html/{path}{anchor}"),
                }
            }
        }
    }
}

/// Maps raw link targets and page paths to online URLs.
pub struct OnlineLinker<'a> {
    /// The publishing site.
    site: &'a OnlineSite,
    /// Guide inference for merged packages.
    inference: &'a dyn SubfolderInference,
}

impl<'a> OnlineLinker<'a> {
    /// Creates a linker for `site`.
    pub fn new(site: &'a OnlineSite, inference: &'a dyn SubfolderInference) -> Self {
        Self { site, inference }
    }

    /// The publishing site.
    pub fn site(&self) -> &OnlineSite {
        self.site
    }

    /// Resolves the guide folder for a target: the target's own hint, then the referencing
    /// page's, then the bundle's.
    fn subfolder_for(&self, target: &str, page: Option<&str>) -> Option<String> {
        self.inference
            .infer(target)
            .or_else(|| page.and_then(|p| self.inference.infer(p)))
            .or_else(|| self.site.subfolder.clone())
    }

    /// Builds the online URL of a raw link target written in `page`.
    ///
    /// The target may climb with `../`, carry any extension and a fragment.
    pub fn url_for(&self, raw_target: &str, page: Option<&str>) -> String {
        let (stripped, fragment) = strip_rel_and_ext(raw_target);
        let hint = self.subfolder_for(&stripped, page);
        let normalized = normalize_target_path(&stripped, self.site.family, hint.as_deref());
        let subfolder = self.inference.infer(&normalized.path).or(hint);
        let url = self
            .site
            .url(&normalized.path, fragment.as_deref(), subfolder.as_deref());
        debug!("online url for {raw_target}: {url}");
        url
    }
}

impl ViewOnline for OnlineLinker<'_> {
    fn page_url(&self, page: &str) -> Option<String> {
        Some(self.url_for(page, Some(page)))
    }
}
