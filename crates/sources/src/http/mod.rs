//! HTTP Source - log bodies in, syslog datagrams out
//!
//! Every request, whatever its method or path, is relayed: the body is read
//! in full, wrapped in a syslog header and written to the sink as one UDP
//! datagram. The response is `204` on success and `500` if the datagram
//! could not be written.
//!
//! ```text
//! POST / HTTP/1.1
//!
//! disk almost full
//! ```
//!
//! becomes
//!
//! ```text
//! <14>Jan 02 15:04:05 web-01 http-to-syslog: disk almost full
//! ```
//!
//! # Example
//!
//! ```ignore
//! use relay_sources::http::{HttpRelaySource, HttpSourceConfig};
//! use relay_sinks::syslog_udp::UdpTransport;
//!
//! let config = HttpSourceConfig::with_listen("0.0.0.0:8888");
//! let transport = Arc::new(UdpTransport::new("127.0.0.1:4242"));
//!
//! let source = HttpRelaySource::new(config, transport);
//! source.run(cancel_token).await?;
//! ```

mod config;
mod error;
mod handlers;

#[cfg(test)]
mod http_test;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use relay_sinks::syslog_udp::SyslogTransport;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use config::{DEFAULT_LISTEN, HttpSourceConfig};
pub use error::HttpSourceError;
pub use handlers::HandlerState;

use handlers::relay;

/// HTTP relay source
pub struct HttpRelaySource {
    config: HttpSourceConfig,
    transport: Arc<dyn SyslogTransport>,
}

impl HttpRelaySource {
    /// Create a new HTTP relay source
    pub fn new(config: HttpSourceConfig, transport: Arc<dyn SyslogTransport>) -> Self {
        Self { config, transport }
    }

    /// Get the source ID
    pub fn source_id(&self) -> &str {
        &self.config.id
    }

    /// Bind the listen address without serving yet
    ///
    /// Useful with port 0: the returned handle reports the real address.
    pub async fn bind(self) -> Result<BoundHttpRelay, HttpSourceError> {
        let listener = bind_listener(&self.config).await?;

        let local_addr = listener.local_addr().map_err(|e| HttpSourceError::Bind {
            address: self.config.listen.clone(),
            source: e,
        })?;

        Ok(BoundHttpRelay {
            config: self.config,
            transport: self.transport,
            listener,
            local_addr,
        })
    }

    /// Run the HTTP source
    ///
    /// Binds to the configured address and serves until cancelled.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), HttpSourceError> {
        self.bind().await?.serve(cancel).await
    }
}

/// HTTP relay source with a bound listener
pub struct BoundHttpRelay {
    config: HttpSourceConfig,
    transport: Arc<dyn SyslogTransport>,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl BoundHttpRelay {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until the token is cancelled
    ///
    /// In-flight requests finish before this returns.
    pub async fn serve(self, cancel: CancellationToken) -> Result<(), HttpSourceError> {
        tracing::info!(
            source_id = %self.config.id,
            address = %self.local_addr,
            destination = %self.transport.destination(),
            "HTTP source listening"
        );

        let state = Arc::new(HandlerState {
            source_id: self.config.id.clone(),
            transport: self.transport,
        });

        let result = axum::serve(self.listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal(cancel))
            .await
            .map_err(HttpSourceError::Serve);

        tracing::info!(source_id = %self.config.id, "HTTP source stopped");

        result
    }
}

/// Bind the first address that works
///
/// Only `:port` yields more than one candidate. The error reports the
/// configured address and the last failure.
async fn bind_listener(config: &HttpSourceConfig) -> Result<TcpListener, HttpSourceError> {
    let mut last_error = None;

    for address in config.bind_addresses() {
        match TcpListener::bind(&address).await {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                tracing::debug!(address = %address, error = %e, "bind attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(HttpSourceError::Bind {
        address: config.listen.clone(),
        source: last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "no address to bind")
        }),
    })
}

/// Build the axum router: every method and path goes to the relay handler
pub fn build_router(state: Arc<HandlerState>) -> Router {
    Router::new().fallback(relay).with_state(state)
}

/// Shutdown signal future
async fn shutdown_signal(cancel: CancellationToken) {
    cancel.cancelled().await;
}
