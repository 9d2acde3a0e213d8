//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Polls the public server listing, republishes filtered job ids, and routes
/// detection alerts.
#[derive(Parser, Debug)]
#[command(name = "jobwatch")]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file. A missing file means environment only.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the poller, the alert intake and the stats bot (default)
    Run,

    /// Validate the configuration and print the effective settings
    Check {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The selected subcommand, `run` when none was given.
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}
