//! Portal configuration loading from config.toml
//!
//! Every section is optional. A missing file is an error, but an empty file
//! yields [`PortalConfig::default`].

use crate::core::challenge::ChallengeRules;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Config file used when `PORTAL_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Public origin of the site, used for referral links
    pub site_origin: String,
    /// Default `tracing` filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// HTTP listener
    pub server: ServerConfig,
    /// Bonus challenge parameters
    pub challenge: ChallengeRules,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            site_origin: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            challenge: ChallengeRules::default(),
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid server address {}:{}: {e}", self.host, self.port),
            })
    }
}

/// Parses and validates a configuration document.
pub fn parse_config(contents: &str) -> Result<PortalConfig> {
    let config: PortalConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if !config.challenge.target.is_finite() {
        return Err(Error::Config {
            message: "challenge.target must be a finite number".to_string(),
        });
    }
    if config.challenge.window_days < 0 {
        return Err(Error::Config {
            message: "challenge.window_days cannot be negative".to_string(),
        });
    }

    Ok(config)
}

/// Loads portal configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PortalConfig> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading configuration");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    parse_config(&contents)
}

/// Loads configuration from `PORTAL_CONFIG`, or `./config.toml`.
///
/// A missing default file is not an error: the portal runs on defaults.
/// A path named explicitly through `PORTAL_CONFIG` must exist.
pub fn load_default_config() -> Result<PortalConfig> {
    match std::env::var("PORTAL_CONFIG") {
        Ok(path) => load_config(path),
        Err(_) if !Path::new(DEFAULT_CONFIG_PATH).exists() => {
            tracing::warn!("no {DEFAULT_CONFIG_PATH} found, using defaults");
            Ok(PortalConfig::default())
        }
        Err(_) => load_config(DEFAULT_CONFIG_PATH),
    }
}
