//! Relay Configuration
//!
//! TOML-based configuration loading with defaults that match the classic
//! `http-to-syslog` behaviour: listen on port 8888, relay to `127.0.0.1:4242`.
//! An empty file (or no file at all) is a valid configuration.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use relay_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[relay]\ndestination = \"10.0.0.5:514\"").unwrap();
//! assert_eq!(config.relay.destination, "10.0.0.5:514");
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [relay]
//! listen = ":8888"
//! destination = "127.0.0.1:4242"
//!
//! [log]
//! level = "info"
//! format = "console"
//! ```

mod error;
mod logging;
mod relay;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use relay::{DEFAULT_DESTINATION, DEFAULT_LISTEN, RelayConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP listen address and syslog destination
    pub relay: RelayConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Also called by the binary after command-line overrides are applied.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
