//! Implementation of `helpbind toc`.

use std::process::ExitCode;

use helpbind_toc::LinearPage;
use serde::Serialize;

use crate::cli::{args::TocCommand, bundle::linearize_bundle, context::CommandContext};

/// One page of the outline, as printed with `--json`.
#[derive(Serialize)]
struct TocEntry<'a> {
    /// Bundle-relative page path.
    path: &'a str,
    /// Nesting depth, starting at 1.
    depth: usize,
    /// Title from the TOC.
    title: &'a str,
}

/// Prints the linearized page order of a bundle.
pub fn run(ctx: &CommandContext, cmd: &TocCommand) -> ExitCode {
    let pages_dir = cmd
        .pages
        .as_ref()
        .map_or_else(|| cmd.bundle.clone(), |pages| cmd.bundle.join(pages));
    let pages = match linearize_bundle(&cmd.bundle, &pages_dir, &ctx.config) {
        Ok((pages, _)) => pages,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        match serde_json::to_string_pretty(&entries(&pages)) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize outline: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for page in &pages {
            println!(
                "{}{}",
                "  ".repeat(page.depth.saturating_sub(1)),
                page.relative_path
            );
        }
    }
    ExitCode::SUCCESS
}

/// Borrows pages as serializable entries.
fn entries(pages: &[LinearPage]) -> Vec<TocEntry<'_>> {
    pages
        .iter()
        .map(|page| TocEntry {
            path: &page.relative_path,
            depth: page.depth,
            title: &page.title,
        })
        .collect()
}
