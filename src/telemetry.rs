//! Tracing subscriber setup.

use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Calling this twice is an error.
pub fn init(log_level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).map_err(|e| Error::Config {
            message: format!("Invalid log level '{log_level}': {e}"),
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| Error::Config {
            message: format!("Failed to install tracing subscriber: {e}"),
        })
}
