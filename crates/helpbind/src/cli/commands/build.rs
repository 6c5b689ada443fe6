//! Implementation of `helpbind build`.

use std::{process::ExitCode, thread};

use crate::cli::{
    args::BuildCommand,
    bundle::{BundleJob, BundleSummary, build_bundle},
    error::BuildError,
};

/// Builds every requested bundle, one thread per bundle.
pub fn run(cmd: &BuildCommand) -> ExitCode {
    if cmd.name.is_some() && cmd.bundles.len() > 1 {
        eprintln!("error: --name can only be used with a single bundle");
        return ExitCode::FAILURE;
    }

    let jobs: Vec<BundleJob> = cmd
        .bundles
        .iter()
        .map(|root| BundleJob::new(root, cmd))
        .collect();

    let results: Vec<Option<Result<BundleSummary, BuildError>>> = thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|job| scope.spawn(move || build_bundle(job)))
            .collect();
        handles.into_iter().map(|h| h.join().ok()).collect()
    });

    let mut failed = false;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Some(Ok(summary)) => print_summary(job, &summary),
            Some(Err(e)) => {
                eprintln!("error: {}: {e}", job.name);
                failed = true;
            }
            None => {
                eprintln!("error: {}: build thread panicked", job.name);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Prints one line per bundle, plus the variant path when one was written.
fn print_summary(job: &BundleJob, summary: &BundleSummary) {
    println!(
        "{}: {} pages, {} images, {} links rewritten, {} unresolved, {} missing anchors -> {}",
        job.name,
        summary.pages,
        summary.images,
        summary.rewritten,
        summary.unresolved,
        summary.missing_anchors,
        summary.document.display()
    );
    if summary.skipped > 0 || summary.anchor_changes > 0 {
        println!(
            "  {} TOC entries skipped, {} anchors renamed or dropped",
            summary.skipped, summary.anchor_changes
        );
    }
    if let Some(external) = &summary.external {
        println!("  external variant -> {}", external.display());
    }
}
