//! Configuration validation
//!
//! Addresses are checked for `host:port` shape only. Name resolution happens
//! at bind time (listen) or per message (destination). The listen address may
//! omit its host (`:8888`) to bind every interface.

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_address("listen", &config.relay.listen, AddressKind::Listen)?;
    validate_address(
        "destination",
        &config.relay.destination,
        AddressKind::Destination,
    )?;
    Ok(())
}

/// Which side of the relay an address is for
#[derive(Clone, Copy, PartialEq, Eq)]
enum AddressKind {
    /// Local bind: empty host and port 0 allowed
    Listen,
    /// Remote syslog server: host and non-zero port required
    Destination,
}

/// Check a `host:port` pair. IPv6 hosts must be bracketed (`[::1]:514`).
fn validate_address(field: &'static str, value: &str, kind: AddressKind) -> Result<()> {
    let invalid = |message: &str| ConfigError::invalid_value("relay", field, value, message);

    let (host, port) = value
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;

    if host.is_empty() && kind == AddressKind::Destination {
        return Err(invalid("host is empty"));
    }

    // An unbracketed host with a colon is an IPv6 literal missing its brackets
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return Err(invalid("IPv6 hosts must be written as [addr]:port"));
    }

    let port: u16 = port
        .parse()
        .map_err(|_| invalid("port must be a number between 0 and 65535"))?;

    if port == 0 && kind == AddressKind::Destination {
        return Err(invalid("port must be non-zero"));
    }

    Ok(())
}
