//! Relay configuration
//!
//! The two addresses the relay needs: where HTTP requests arrive and where
//! syslog datagrams go. Both are fixed for the lifetime of the process.

use serde::Deserialize;

/// Default HTTP bind address (all interfaces, port 8888)
///
/// An empty host binds every interface, IPv6 and IPv4.
pub const DEFAULT_LISTEN: &str = ":8888";

/// Default syslog destination
pub const DEFAULT_DESTINATION: &str = "127.0.0.1:4242";

/// Relay configuration
///
/// # Example
///
/// ```toml
/// [relay]
/// listen = ":8888"                # default
/// destination = "127.0.0.1:4242"   # default
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    /// HTTP bind address (host:port, empty host for all interfaces)
    /// Default: ":8888"
    pub listen: String,

    /// Syslog UDP destination (host:port, host may be a name)
    /// Default: "127.0.0.1:4242"
    pub destination: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.into(),
            destination: DEFAULT_DESTINATION.into(),
        }
    }
}

impl RelayConfig {
    /// Override the listen address if one is given
    pub fn with_listen(mut self, listen: Option<String>) -> Self {
        if let Some(listen) = listen {
            self.listen = listen;
        }
        self
    }

    /// Override the destination address if one is given
    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        if let Some(destination) = destination {
            self.destination = destination;
        }
        self
    }
}
