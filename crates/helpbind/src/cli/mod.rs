//! CLI support for the `helpbind` binary.

pub mod args;
pub mod bundle;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod site;

pub use context::CommandContext;
