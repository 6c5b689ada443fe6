//! Implementation of `helpbind validate`.

use std::process::ExitCode;

use helpbind_links::{ValidationReport, read_document, validate_document, write_report};
use log::info;
use serde_json::json;

use crate::cli::args::ValidateCommand;

/// Checks fragment links of an assembled document against its anchors.
pub fn run(cmd: &ValidateCommand) -> ExitCode {
    let document = match read_document(&cmd.document) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let report = validate_document(&document);

    if cmd.json {
        println!("{}", report_json(&report));
    } else {
        for missing in &report.missing {
            println!("{missing}");
        }
    }
    info!(
        "{} anchors, {} fragment references, {} missing",
        report.anchors,
        report.references,
        report.missing.len()
    );

    if let Some(path) = &cmd.report
        && let Err(e) = write_report(path, &report.missing)
    {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    if cmd.strict && !report.is_clean() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Renders a report as JSON.
fn report_json(report: &ValidationReport) -> String {
    let missing: Vec<_> = report
        .missing
        .iter()
        .map(|m| {
            json!({
                "fragment": m.fragment,
                "page": m.page,
                "line": m.line,
            })
        })
        .collect();
    json!({
        "anchors": report.anchors,
        "references": report.references,
        "missing": missing,
    })
    .to_string()
}
