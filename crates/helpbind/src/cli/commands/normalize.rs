//! Implementation of `helpbind normalize`.

use std::process::ExitCode;

use helpbind_links::{
    OnlineLinker, SubfolderInference, normalize_target_path, strip_rel_and_ext,
};

use crate::cli::{
    args::NormalizeCommand,
    context::CommandContext,
    site::{SiteSettings, subfolder_inference},
};

/// Prints how a link target is normalized and, with a base URL, where it is published.
pub fn run(ctx: &CommandContext, cmd: &NormalizeCommand) -> ExitCode {
    let config = &ctx.config;
    let site = match SiteSettings::resolve(config, &cmd.site, None, false) {
        Ok(site) => site,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let inference = subfolder_inference(config);

    let (stripped, fragment) = strip_rel_and_ext(&cmd.path);
    let subfolder = inference
        .infer(&stripped)
        .or_else(|| cmd.page.as_deref().and_then(|page| inference.infer(page)))
        .or_else(|| site.subfolder.clone());
    let normalized = normalize_target_path(&stripped, site.family, subfolder.as_deref());

    let fired: Vec<String> = normalized.fired.iter().map(ToString::to_string).collect();
    println!("family:     {}", site.family);
    println!("stripped:   {stripped}");
    println!("normalized: {}", normalized.path);
    println!(
        "rules:      {}",
        if fired.is_empty() {
            "none".to_string()
        } else {
            fired.join(", ")
        }
    );
    if let Some(fragment) = fragment {
        println!("fragment:   {fragment}");
    }
    if let Some(subfolder) = &subfolder {
        println!("guide:      {subfolder}");
    }

    if let Some(online) = site.online_site(config) {
        let linker = OnlineLinker::new(&online, &inference);
        println!("url:        {}", linker.url_for(&cmd.path, cmd.page.as_deref()));
    }
    ExitCode::SUCCESS
}
