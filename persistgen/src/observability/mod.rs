//! Logging setup for hosts and tools embedding the processor.
//!
//! The processing core only emits `tracing` events; installing a subscriber
//! is left to the binary. These helpers install the usual one.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,persistgen=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a human readable subscriber as the global default.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Installs a JSON subscriber as the global default.
pub fn init_json_logging() -> Result<()> {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
