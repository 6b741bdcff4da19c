//! Syslog UDP Sink
//!
//! Sends one syslog datagram per log body.
//!
//! # Design
//!
//! Every send is self-contained:
//! - Resolve the destination and open a fresh UDP socket connected to it
//! - Write the whole message as a single datagram
//! - Drop the socket, whatever the outcome
//!
//! Nothing is shared between sends, so concurrent callers never contend.
//! There are no retries and no timeouts. A successful send only means the
//! kernel accepted the datagram; UDP gives no delivery confirmation.
//!
//! # Example
//!
//! ```ignore
//! let transport = UdpTransport::new("127.0.0.1:4242");
//! let message = SyslogMessage::new("disk almost full");
//!
//! match transport.send(&message.to_datagram()).await {
//!     Ok(bytes) => tracing::info!(bytes, "sent"),
//!     Err(e) => tracing::error!(error = %e, "send failed"),
//! }
//! ```

mod message;

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{UdpSocket, lookup_host};

pub use message::{Priority, SyslogMessage, TAG, TIMESTAMP_FORMAT};

/// Errors from the syslog UDP sink
#[derive(Debug, thiserror::Error)]
pub enum SyslogSinkError {
    /// Socket could not be opened (resolution, bind or connect)
    #[error("failed to open UDP connection to {destination}: {source}")]
    Dial {
        destination: String,
        #[source]
        source: io::Error,
    },

    /// Datagram write failed after the socket was opened
    #[error("failed to send message over UDP to {destination}: {source}")]
    Write {
        destination: String,
        #[source]
        source: io::Error,
    },
}

impl SyslogSinkError {
    /// Create a Dial error
    pub fn dial(destination: impl Into<String>, source: io::Error) -> Self {
        Self::Dial {
            destination: destination.into(),
            source,
        }
    }

    /// Create a Write error
    pub fn write(destination: impl Into<String>, source: io::Error) -> Self {
        Self::Write {
            destination: destination.into(),
            source,
        }
    }
}

/// Delivery of an encoded syslog datagram
#[async_trait]
pub trait SyslogTransport: Send + Sync {
    /// Send one datagram, returning the number of bytes written
    async fn send(&self, datagram: &[u8]) -> Result<usize, SyslogSinkError>;

    /// Human-readable destination for logging
    fn destination(&self) -> &str;
}

/// Per-message UDP transport
#[derive(Debug, Clone)]
pub struct UdpTransport {
    destination: String,
}

impl UdpTransport {
    /// Create a transport for `host:port`
    ///
    /// The address is resolved on every send, not here.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Resolve the destination and open a connected socket
    async fn dial(&self) -> io::Result<UdpSocket> {
        let target = lookup_host(self.destination.as_str())
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "destination resolved to no addresses")
            })?;

        let socket = UdpSocket::bind(unspecified_for(target)).await?;
        socket.connect(target).await?;
        Ok(socket)
    }
}

#[async_trait]
impl SyslogTransport for UdpTransport {
    async fn send(&self, datagram: &[u8]) -> Result<usize, SyslogSinkError> {
        let socket = self
            .dial()
            .await
            .map_err(|e| SyslogSinkError::dial(&self.destination, e))?;

        // `socket` is dropped (closed) on return from either branch
        socket
            .send(datagram)
            .await
            .map_err(|e| SyslogSinkError::write(&self.destination, e))
    }

    fn destination(&self) -> &str {
        &self.destination
    }
}

/// Ephemeral local address in the same family as `target`
fn unspecified_for(target: SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}
