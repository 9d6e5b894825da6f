//! Logging setup for the obsync binary
//!
//! Logs go to stderr so that stdout carries only command output.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Level used when neither `RUST_LOG` nor a verbosity flag is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default filter directive for the given verbosity flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Install the global tracing subscriber; `RUST_LOG` overrides the flags
pub fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose, quiet)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
