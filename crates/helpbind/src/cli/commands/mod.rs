//! Command implementations and dispatch.

pub mod build;
pub mod config;
pub mod init;
pub mod normalize;
pub mod resolve;
pub mod toc;
pub mod validate;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Build(cmd) => build::run(&cmd),
        Commands::Resolve(cmd) => resolve::run(ctx, &cmd),
        Commands::Validate(cmd) => validate::run(&cmd),
        Commands::Normalize(cmd) => normalize::run(ctx, &cmd),
        Commands::Toc(cmd) => toc::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
