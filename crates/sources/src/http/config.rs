//! HTTP source configuration

/// Default HTTP bind address
///
/// Same value as `relay_config::DEFAULT_LISTEN`. This crate does not depend on
/// the config crate; the binary always passes the resolved address through
/// [`HttpSourceConfig::with_listen`], so this default only applies to library
/// users building a source by hand.
pub const DEFAULT_LISTEN: &str = ":8888";

/// Hosts tried, in order, when the listen address has no host
///
/// `[::]` accepts IPv4 too where the OS allows dual-stack sockets. `0.0.0.0`
/// covers hosts without IPv6.
const ANY_HOSTS: [&str; 2] = ["[::]", "0.0.0.0"];

/// HTTP source configuration
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Source identifier used in log lines
    pub id: String,

    /// Bind address (host:port)
    pub listen: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            id: "http".into(),
            listen: DEFAULT_LISTEN.into(),
        }
    }
}

impl HttpSourceConfig {
    /// Create config with a custom bind address
    pub fn with_listen(listen: impl Into<String>) -> Self {
        Self {
            listen: listen.into(),
            ..Default::default()
        }
    }

    /// Concrete addresses to bind, in order of preference
    ///
    /// `:port` expands to every interface. Anything else is used as given.
    pub fn bind_addresses(&self) -> Vec<String> {
        match self.listen.strip_prefix(':') {
            Some(port) if !port.contains(':') => ANY_HOSTS
                .iter()
                .map(|host| format!("{host}:{port}"))
                .collect(),
            _ => vec![self.listen.clone()],
        }
    }
}
