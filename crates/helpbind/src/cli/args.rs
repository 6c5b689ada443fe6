//! Clap argument definitions for the `helpbind` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "helpbind")]
#[command(about = "Bind converted help bundles into single linked Markdown documents")]
pub struct Cli {
    /// More log output (-v for debug, -vv for trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags describing where a bundle is published online.
#[derive(Args, Debug, Clone, Default)]
pub struct SiteArgs {
    /// Documentation family: standard or merged-multi-guide [default: detected]
    #[arg(long)]
    pub family: Option<String>,

    /// Guide subfolder of a merged site (e.g. expert)
    #[arg(long)]
    pub subfolder: Option<String>,

    /// Published site directory [default: bundle directory name]
    #[arg(long)]
    pub site_dir: Option<String>,

    /// Base URL of the documentation host
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for `helpbind build`.
#[derive(Args, Debug, Clone)]
pub struct BuildCommand {
    /// Bundle directories, each holding Data/Tocs/
    #[arg(required = true)]
    pub bundles: Vec<PathBuf>,

    /// Directory of converted pages, relative to each bundle [default: the bundle itself]
    #[arg(long)]
    pub pages: Option<PathBuf>,

    /// Output directory [default: the bundle itself]; one subdirectory per bundle when
    /// several are given
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Document name [default: bundle directory name]; only with a single bundle
    #[arg(long)]
    pub name: Option<String>,

    /// Also write the external-links variant
    #[arg(long)]
    pub external: bool,

    /// Never produce online links
    #[arg(long)]
    pub no_online: bool,

    #[command(flatten)]
    /// Online site overrides.
    pub site: SiteArgs,
}

/// Arguments for `helpbind resolve`.
#[derive(Args, Debug, Clone)]
pub struct ResolveCommand {
    /// Assembled document
    pub document: PathBuf,

    /// Anchor map written by `helpbind build`
    #[arg(long)]
    pub anchors: PathBuf,

    /// Point every link at the online site
    #[arg(long)]
    pub external: bool,

    /// Output file [default: stdout]
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Write unresolved links to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    /// Online site overrides.
    pub site: SiteArgs,
}

/// Arguments for `helpbind validate`.
#[derive(Args, Debug, Clone)]
pub struct ValidateCommand {
    /// Assembled document
    pub document: PathBuf,

    /// Write missing anchors to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Exit with status 1 when anchors are missing
    #[arg(long)]
    pub strict: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `helpbind normalize`.
#[derive(Args, Debug, Clone)]
pub struct NormalizeCommand {
    /// Link target as written in a page
    pub path: String,

    /// Path of the page holding the link, used to infer the guide
    #[arg(long)]
    pub page: Option<String>,

    #[command(flatten)]
    /// Online site overrides.
    pub site: SiteArgs,
}

/// Arguments for `helpbind toc`.
#[derive(Args, Debug, Clone)]
pub struct TocCommand {
    /// Bundle directory holding Data/Tocs/
    pub bundle: PathBuf,

    /// Directory of converted pages, relative to the bundle [default: the bundle itself]
    #[arg(long)]
    pub pages: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `helpbind init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.helpbind.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `helpbind` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Assemble bundles into linked documents
    #[command(after_help = "\
OUTPUTS (per bundle):
  __{name}.md            Assembled, resolved document
  __{name}_external.md   External-links variant (--external)
  __anchors.json         Page -> anchor map
  __toc.txt              Page order
  __hierarchy.txt        Page order with depths
  unresolved_links.txt   Links left as written
  missing_anchors.txt    Fragments with no anchor

EXAMPLES:
  helpbind build bundles/Content
  helpbind build bundles/* --out build --external
  helpbind build bundles/IDOLServer --family merged-multi-guide --subfolder expert")]
    Build(BuildCommand),

    /// Resolve links in a copy of an assembled document
    Resolve(ResolveCommand),

    /// Check that every fragment link has an anchor
    Validate(ValidateCommand),

    /// Show how a link target is normalized and published
    Normalize(NormalizeCommand),

    /// Print the linearized page order of a bundle
    Toc(TocCommand),

    /// Initialize helpbind configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["helpbind", "toc", "bundle", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["helpbind", "-q", "-v", "config"]).is_err());
    }

    #[test]
    fn build_takes_several_bundles() {
        let cli = Cli::try_parse_from(["helpbind", "build", "a", "b", "--external"]).unwrap();
        let Commands::Build(cmd) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(cmd.bundles, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(cmd.external);
        assert!(cmd.site.family.is_none());
    }
}
