//! Logging setup.
//!
//! All diagnostics go to stderr; stdout is reserved for the report, whose
//! formats are byte-exact contracts.

use anyhow::{Result, anyhow};
use tracing_subscriber::filter::EnvFilter;

/// Build an `EnvFilter` from CLI flags and the environment.
///
/// Priority: quiet flag > verbose flag > `RUST_LOG` env > `default_level`.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber writing to stderr.
pub fn init(filter: EnvFilter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
