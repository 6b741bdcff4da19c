//! HTTP route handlers
//!
//! A single handler serves every method and path. Headers, path and method
//! are ignored; only the body matters.
//!
//! # Responses
//!
//! - `204 No Content` - datagram handed to the kernel
//! - `500 Internal Server Error` - socket could not be opened or written
//!
//! No other status is ever produced and responses never carry a body.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::StatusCode;
use relay_sinks::syslog_udp::{SyslogMessage, SyslogSinkError, SyslogTransport};

/// Shared state for handlers
pub struct HandlerState {
    pub source_id: String,
    pub transport: Arc<dyn SyslogTransport>,
}

/// ANY /* - Relay the request body as one syslog datagram
pub async fn relay(State(state): State<Arc<HandlerState>>, body: Body) -> StatusCode {
    let body = read_body(&state.source_id, body).await;
    let message = SyslogMessage::new(body);

    tracing::info!(
        source_id = %state.source_id,
        message = %message,
        "sending to syslog"
    );

    match state.transport.send(&message.to_datagram()).await {
        Ok(bytes) => {
            tracing::info!(
                source_id = %state.source_id,
                destination = %state.transport.destination(),
                bytes,
                "message successfully sent"
            );
            StatusCode::NO_CONTENT
        }
        Err(e @ SyslogSinkError::Dial { .. }) => {
            tracing::error!(source_id = %state.source_id, error = %e, "failed to open UDP connection");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Err(e @ SyslogSinkError::Write { .. }) => {
            tracing::error!(source_id = %state.source_id, error = %e, "failed to send message over UDP");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Collect the whole body; a failed read counts as an empty body
async fn read_body(source_id: &str, body: Body) -> Bytes {
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                source_id = %source_id,
                error = %e,
                "failed to read request body, relaying empty message"
            );
            Bytes::new()
        }
    }
}
