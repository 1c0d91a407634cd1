//! delegata CLI library
//!
//! Inspects and validates the configuration a delegata engine is built
//! from: language default tables and registry definitions.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use error::{CliError, CliResult};

use clap::Parser;
use commands::{Commands, Context};
use config::CliConfig;
use output::OutputFormat;
use std::io::Write;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "delegata", version, about = "Inspect delegata language tables and registries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./delegata.toml if present)
    #[arg(long, global = true, value_name = "FILE", env = "DELEGATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Load configuration and run the selected command
    pub fn run<W: Write>(&self, out: &mut W) -> CliResult<()> {
        commands::init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        let ctx = Context {
            config: CliConfig::load(self.config.as_deref())?,
            format: self.format,
        };
        self.command.execute(&ctx, out)
    }
}
