//! Command-line interface for the `helpbind` help bundle binder.

use std::process::ExitCode;

use clap::Parser;
use helpbind::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands, logging,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Build loads configuration per bundle; init must work with a broken config.
    let ctx = match &cli.command {
        Commands::Init(_) | Commands::Build(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
