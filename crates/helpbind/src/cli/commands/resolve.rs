//! Implementation of `helpbind resolve`.

use std::process::ExitCode;

use helpbind_document::AnchorMap;
use helpbind_links::{
    LinkResolver, OnlineLinker, Resolution, build_external, dedupe_anchors, read_document,
    unwrap_commented_links, write_document, write_report,
};
use log::info;

use crate::cli::{
    args::ResolveCommand,
    context::CommandContext,
    site::{SiteSettings, subfolder_inference},
};

/// Resolves links in an assembled document against a saved anchor map.
pub fn run(ctx: &CommandContext, cmd: &ResolveCommand) -> ExitCode {
    let config = &ctx.config;
    let document = match read_document(&cmd.document) {
        Ok(text) => unwrap_commented_links(&text),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let anchors = match AnchorMap::load(&cmd.anchors) {
        Ok(anchors) => anchors,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let site = match SiteSettings::resolve(config, &cmd.site, None, false) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let inference = subfolder_inference(config);
    let online_site = site.online_site(config);
    let linker = online_site
        .as_ref()
        .map(|online| OnlineLinker::new(online, &inference));
    let extension = config.bundle.page_extension.as_str();

    let resolution = if cmd.external {
        let Some(linker) = &linker else {
            eprintln!("error: --external needs online.base_url or --base-url");
            return ExitCode::FAILURE;
        };
        build_external(&document, &anchors, linker, extension)
    } else {
        let mut resolver = LinkResolver::new(&anchors).with_page_extension(extension);
        if let Some(linker) = &linker {
            resolver = resolver.with_online(linker);
        }
        let resolution = resolver.resolve(&document);
        Resolution {
            document: dedupe_anchors(&resolution.document).document,
            ..resolution
        }
    };

    info!(
        "{} links rewritten, {} unresolved",
        resolution.rewritten,
        resolution.unresolved.len()
    );

    if let Some(report) = &cmd.report
        && let Err(e) = write_report(report, &resolution.unresolved)
    {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match &cmd.out {
        Some(out) => {
            if let Err(e) = write_document(out, &resolution.document) {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", resolution.document),
    }
    ExitCode::SUCCESS
}
