//! Log output setup.
//!
//! Libraries log through the `log` facade; the binary routes those records to stderr with
//! `env_logger`. `RUST_LOG`, when set, takes precedence over the command-line flags.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Maps `-v`/`-q` flags to a level filter. The default is `info`.
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initializes the global logger.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_filter(verbose, quiet);
    Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
