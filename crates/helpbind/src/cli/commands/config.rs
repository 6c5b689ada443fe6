//! Implementation of `helpbind config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
///
/// Warnings were already logged when the context was loaded; an exclude pattern that does not
/// compile is reported here as an error.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    if let Some(root) = &config.config_root {
        println!("# nearest config: {}", root.display());
    }
    match config.settings_to_toml() {
        Ok(toml) => print!("{toml}"),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    }
    if let Err(e) = config.compile_exclusions() {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
