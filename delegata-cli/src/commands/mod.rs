//! CLI command implementations

use crate::config::CliConfig;
use crate::output::OutputFormat;
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

pub mod groups;
pub mod languages;
pub mod resolve;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List known languages and whether a default table is loaded
    Languages(languages::LanguagesArgs),

    /// Show the default delegate chain for a group in a language
    Resolve(resolve::ResolveArgs),

    /// List the groups of a registry and the operations they install
    Groups(groups::GroupsArgs),

    /// Validate language tables and registry files
    Validate(validate::ValidateArgs),
}

/// State shared by every command
#[derive(Debug, Default)]
pub struct Context {
    /// Loaded CLI configuration
    pub config: CliConfig,
    /// Requested output format
    pub format: OutputFormat,
}

impl Commands {
    /// Execute the command, writing results to `out`
    pub fn execute<W: Write>(&self, ctx: &Context, out: &mut W) -> Result<()> {
        match self {
            Commands::Languages(args) => args.execute(ctx, out),
            Commands::Resolve(args) => args.execute(ctx, out),
            Commands::Groups(args) => args.execute(ctx, out),
            Commands::Validate(args) => args.execute(ctx, out),
        }
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    // A second initialization (e.g. in tests) is harmless
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
