//! cue - console front-end for the billiard occupancy backend
//!
//! # Usage
//!
//! ```bash
//! # List tables, second page of 20
//! cue tables list --page 2 --limit 20
//!
//! # Open a table for the next hour, starting in five minutes
//! cue occupations create --table 3 --start now+5m --finish now+65m
//!
//! # Live countdown until Ctrl-C
//! cue watch 3
//!
//! # Backend from the environment (or a .env file)
//! export CUE_BACKEND_URL=http://billiards.local:8080
//! cue --json occupations list --table 3 --sort started_at --desc
//! ```

mod cli;
mod commands;
mod logger;
mod output;
mod time_arg;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    logger::init_logger(&cli.global.log_level, cli.global.log_json)?;

    cli.run().await
}
