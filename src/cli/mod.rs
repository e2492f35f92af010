//! Command-line interface for projgen.
//!
//! ```bash
//! projgen generate                      # use ./projgen.toml
//! projgen -v generate --environment vs2019 --output build/generated
//! projgen generate --solution "OpenPetra.Server=Ict.Common,Ict.Petra.Server"
//! projgen order --format json
//! projgen --config build/projgen.toml check
//! ```
//!
//! # Logging
//!
//! `RUST_LOG` wins when set. Otherwise `--verbose` logs at debug level,
//! `--quiet` only shows errors, and the default is info.

mod check;
mod generate;
mod order;

pub use check::CheckCommand;
pub use generate::GenerateCommand;
pub use order::OrderCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{CONFIG_FILE_NAME, GeneratorConfig};

/// Main CLI structure for projgen.
#[derive(Parser)]
#[command(
    name = "projgen",
    about = "Generate project and solution descriptors from a build dependency map",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors and suppress the summary
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the configuration file (default: ./projgen.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every project and solution descriptor
    Generate(GenerateCommand),

    /// Print the build order of all units
    Order(OrderCommand),

    /// Validate the dependency map and template set without writing anything
    Check(CheckCommand),
}

/// Output format for commands that print data.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON for scripts
    Json,
}

impl Cli {
    /// Log filter derived from the global flags.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Install the global `tracing` subscriber. Logs go to stderr.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }

    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        let config_path = self.config_path();
        match self.command {
            Commands::Generate(cmd) => cmd.execute(&config_path, self.quiet),
            Commands::Order(cmd) => cmd.execute(&config_path),
            Commands::Check(cmd) => cmd.execute(&config_path, self.quiet),
        }
    }
}

fn load_config(path: &Path) -> Result<GeneratorConfig> {
    Ok(GeneratorConfig::load(path)?)
}
