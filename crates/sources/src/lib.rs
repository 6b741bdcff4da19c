//! Relay - Sources
//!
//! Network sources that receive log bodies and hand each one straight to a
//! sink. There is no batching or queueing between the two: the HTTP response
//! reflects the outcome of the sink call for that very request.
//!
//! # Available Sources
//!
//! - **HTTP** - Catch-all endpoint, one syslog datagram per request body
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use relay_sinks::syslog_udp::UdpTransport;
//! use relay_sources::{HttpRelaySource, HttpSourceConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let transport = Arc::new(UdpTransport::new("127.0.0.1:4242"));
//! let source = HttpRelaySource::new(HttpSourceConfig::default(), transport);
//! source.run(CancellationToken::new()).await?;
//! ```

pub mod http;

pub use http::{
    BoundHttpRelay, DEFAULT_LISTEN, HttpRelaySource, HttpSourceConfig, HttpSourceError,
};
