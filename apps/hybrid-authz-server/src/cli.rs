//! Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "hybrid-authz-server", version, about = "Hybrid RBAC/ReBAC authorization server")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the HTTP API (default)
    Run,
    /// Create an `OpenFGA` store and write the authorization model
    SetupFga {
        /// Name of the store to create
        #[arg(long, default_value = "hybrid-authz")]
        store_name: String,
    },
    /// Load and validate the configuration, then exit
    CheckConfig,
}

impl Cli {
    #[must_use]
    pub fn action(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
