//! The per-bundle build pipeline.
//!
//! TOC -> linearized pages -> assembled document -> unified images -> resolved links ->
//! unique anchors -> validation. Each bundle owns all of its state, so several bundles can be
//! built at once.

use std::{
    fs,
    path::{Path, PathBuf},
};

use helpbind_config::Config;
use helpbind_document::Assembler;
use helpbind_links::{
    AssetUnifier, FsAssetLocator, LinkResolver, OnlineLinker, build_external, dedupe_anchors,
    unwrap_commented_links, validate_document, write_document, write_report,
};
use helpbind_toc::{FsPageSource, LinearPage, Linearizer, load_bundle, write_outline};
use log::{info, warn};

use crate::cli::{
    args::{BuildCommand, SiteArgs},
    error::BuildError,
    site::{SiteSettings, directory_name, subfolder_inference},
};

/// One bundle to build.
#[derive(Debug, Clone)]
pub struct BundleJob {
    /// Bundle directory holding `Data/Tocs/`.
    pub root: PathBuf,
    /// Directory of converted pages.
    pub pages_dir: PathBuf,
    /// Directory outputs are written to.
    pub out_dir: PathBuf,
    /// Document name.
    pub name: String,
    /// Whether to write the external-links variant.
    pub external: bool,
    /// Whether online links are off.
    pub no_online: bool,
    /// Online site overrides.
    pub site: SiteArgs,
}

impl BundleJob {
    /// Describes the build of `root` requested by `cmd`.
    ///
    /// When several bundles are built into one `--out` directory each gets its own
    /// subdirectory.
    pub fn new(root: &Path, cmd: &BuildCommand) -> Self {
        let name = cmd
            .name
            .clone()
            .or_else(|| directory_name(root))
            .unwrap_or_else(|| "bundle".to_string());
        let out_dir = match &cmd.out {
            Some(out) if cmd.bundles.len() > 1 => out.join(&name),
            Some(out) => out.clone(),
            None => root.to_path_buf(),
        };
        let pages_dir = cmd
            .pages
            .as_ref()
            .map_or_else(|| root.to_path_buf(), |pages| root.join(pages));

        Self {
            root: root.to_path_buf(),
            pages_dir,
            out_dir,
            name,
            external: cmd.external,
            no_online: cmd.no_online,
            site: cmd.site.clone(),
        }
    }

    /// Path of the assembled document.
    pub fn document_path(&self) -> PathBuf {
        self.out_dir.join(format!("__{}.md", self.name))
    }

    /// Path of the external-links variant.
    pub fn external_path(&self) -> PathBuf {
        self.out_dir.join(format!("__{}_external.md", self.name))
    }
}

/// What a bundle build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSummary {
    /// Pages assembled.
    pub pages: usize,
    /// TOC nodes skipped as missing or duplicate.
    pub skipped: usize,
    /// Images gathered into the assets folder.
    pub images: usize,
    /// Links rewritten.
    pub rewritten: usize,
    /// Links left as written.
    pub unresolved: usize,
    /// Anchors renamed or dropped to keep ids unique.
    pub anchor_changes: usize,
    /// Fragment references with no anchor.
    pub missing_anchors: usize,
    /// The assembled document.
    pub document: PathBuf,
    /// The external-links variant, if written.
    pub external: Option<PathBuf>,
}

/// Linearizes the bundle's TOC into page order and persists the outline files.
pub fn linearize_bundle(
    root: &Path,
    pages_dir: &Path,
    config: &Config,
) -> Result<(Vec<LinearPage>, usize), BuildError> {
    let exclusions = config.compile_exclusions()?;
    let exclude = |page: &str| exclusions.is_excluded(page);
    let source = FsPageSource::new(pages_dir);

    let toc = load_bundle(root)?;
    let linearization = Linearizer::new(&source, &exclude)
        .with_page_extension(&config.bundle.page_extension)
        .linearize(&toc.roots);
    if linearization.pages.is_empty() {
        return Err(BuildError::NoPages {
            bundle: root.to_path_buf(),
        });
    }
    let skipped = linearization.diagnostics.len() + toc.skipped.len();
    Ok((linearization.pages, skipped))
}

/// Builds one bundle, writing every output into its output directory.
pub fn build_bundle(job: &BundleJob) -> Result<BundleSummary, BuildError> {
    let config = Config::load(&job.root)?;
    for warning in config.validate() {
        warn!("{}: {warning}", job.name);
    }
    let site = SiteSettings::resolve(&config, &job.site, Some(&job.root), job.no_online)?;
    let extension = config.bundle.page_extension.as_str();

    fs::create_dir_all(&job.out_dir).map_err(|source| BuildError::CreateDir {
        path: job.out_dir.clone(),
        source,
    })?;

    let (pages, skipped) = linearize_bundle(&job.root, &job.pages_dir, &config)?;
    write_outline(&job.out_dir, &pages)?;

    let inference = subfolder_inference(&config);
    let online_site = site.online_site(&config);
    let linker = online_site
        .as_ref()
        .map(|online| OnlineLinker::new(online, &inference));

    let source = FsPageSource::new(&job.pages_dir);
    let mut assembler = Assembler::new(&source);
    if config.online.decorate_headings
        && let Some(linker) = &linker
    {
        assembler = assembler.with_online(linker);
    }
    let assembly = assembler.assemble(&pages);
    assembly
        .anchors
        .save(&job.out_dir.join(&config.output.anchor_map))?;

    let assets_dir = config.assets_dir(Some(&site.site_dir));
    let locator = FsAssetLocator::new(&job.pages_dir).with_root(&job.root);
    let unified = AssetUnifier::new(&locator, job.out_dir.join(&assets_dir), &assets_dir)
        .unify(&assembly.document)?;
    let document = unwrap_commented_links(&unified.document);

    let mut resolver = LinkResolver::new(&assembly.anchors).with_page_extension(extension);
    if let Some(linker) = &linker {
        resolver = resolver.with_online(linker);
    }
    let resolution = resolver.resolve(&document);
    let deduped = dedupe_anchors(&resolution.document);
    let report = validate_document(&deduped.document);

    let document_path = job.document_path();
    write_document(&document_path, &deduped.document)?;
    write_report(
        &job.out_dir.join(&config.output.unresolved_report),
        &resolution.unresolved,
    )?;
    write_report(
        &job.out_dir.join(&config.output.missing_report),
        &report.missing,
    )?;

    let external = if job.external || config.output.external_variant {
        let Some(linker) = &linker else {
            return Err(BuildError::ExternalWithoutOnline);
        };
        let variant = build_external(&document, &assembly.anchors, linker, extension);
        let path = job.external_path();
        write_document(&path, &variant.document)?;
        Some(path)
    } else {
        None
    };

    info!(
        "{}: {} pages, {} links rewritten, {} unresolved, {} missing anchors",
        job.name,
        assembly.pages.len(),
        resolution.rewritten,
        resolution.unresolved.len(),
        report.missing.len()
    );

    Ok(BundleSummary {
        pages: assembly.pages.len(),
        skipped: skipped + assembly.skipped.len(),
        images: unified.copied.len(),
        rewritten: resolution.rewritten,
        unresolved: resolution.unresolved.len(),
        anchor_changes: deduped.changes.len(),
        missing_anchors: report.missing.len(),
        document: document_path,
        external,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(bundles: &[&str], out: Option<&str>) -> BuildCommand {
        BuildCommand {
            bundles: bundles.iter().map(PathBuf::from).collect(),
            pages: Some(PathBuf::from("md")),
            out: out.map(PathBuf::from),
            name: None,
            external: false,
            no_online: false,
            site: SiteArgs::default(),
        }
    }

    #[test]
    fn single_bundle_writes_into_out() {
        let cmd = command(&["/work/Content"], Some("/build"));
        let job = BundleJob::new(Path::new("/work/Content"), &cmd);
        assert_eq!(job.name, "Content");
        assert_eq!(job.out_dir, PathBuf::from("/build"));
        assert_eq!(job.pages_dir, PathBuf::from("/work/Content/md"));
        assert_eq!(job.document_path(), PathBuf::from("/build/__Content.md"));
    }

    #[test]
    fn several_bundles_get_subdirectories() {
        let cmd = command(&["/work/A", "/work/B"], Some("/build"));
        let job = BundleJob::new(Path::new("/work/B"), &cmd);
        assert_eq!(job.out_dir, PathBuf::from("/build/B"));
        assert_eq!(job.external_path(), PathBuf::from("/build/B/__B_external.md"));
    }

    #[test]
    fn outputs_default_to_bundle() {
        let cmd = command(&["/work/A"], None);
        let job = BundleJob::new(Path::new("/work/A"), &cmd);
        assert_eq!(job.out_dir, PathBuf::from("/work/A"));
    }
}
