//! Logging setup
//!
//! Everything goes to stderr so command output on stdout stays clean.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level or filter directive (e.g., "info", "cue_client=debug")
/// * `json_format` - Whether to use JSON format
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json_format {
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(std::io::stderr);
        subscriber.with(console_layer).try_init()?;
    } else {
        let console_layer = fmt::layer()
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr);
        subscriber.with(console_layer).try_init()?;
    }

    Ok(())
}
