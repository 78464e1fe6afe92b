//! CLI argument parsing and command dispatch.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cue_client::{ClientConfig, HttpClient};

use crate::commands::occupations::OccupationCommand;
use crate::commands::tables::TableCommand;
use crate::commands::watch::WatchArgs;

/// Console front-end for the billiard occupancy backend.
#[derive(Parser)]
#[command(name = "cue")]
#[command(version)]
#[command(about = "Manage billiard tables and their occupations")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Global options available to all commands.
#[derive(Args, Clone)]
pub struct GlobalOptions {
    /// Backend base URL.
    ///
    /// Defaults to http://localhost:8080.
    #[arg(long, env = "CUE_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout", env = "CUE_REQUEST_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Log level or filter directive; RUST_LOG wins when set.
    #[arg(long, env = "CUE_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output JSON instead of human-readable format.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Environment defaults, overridden by explicit flags.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.backend_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(timeout) = self.timeout_secs {
            config = config.with_timeout(timeout);
        }
        config
    }
}

/// Top-level command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Billiard tables.
    #[command(subcommand)]
    Tables(TableCommand),

    /// Table occupations (reservations and open tables).
    #[command(subcommand)]
    Occupations(OccupationCommand),

    /// Live countdown of a table's current occupation.
    Watch(WatchArgs),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn run(self) -> Result<()> {
        let config = self.global.client_config();
        let client = HttpClient::new(&config).context("failed to build HTTP client")?;
        tracing::debug!(backend = %client.base_url(), "Using backend");

        let json = self.global.json;
        match self.command {
            Commands::Tables(cmd) => cmd.run(&client, json).await,
            Commands::Occupations(cmd) => cmd.run(&client, json).await,
            Commands::Watch(args) => args.run(client, &config, json).await,
        }
    }
}
