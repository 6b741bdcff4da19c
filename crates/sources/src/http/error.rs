//! HTTP source error types
//!
//! Only startup and server-level failures live here. Per-request failures
//! never escape the handler; they become a 500 response.

/// HTTP source errors
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceError {
    /// Failed to bind to address
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Server stopped with an I/O error
    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}
