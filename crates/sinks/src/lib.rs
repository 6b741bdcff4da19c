//! Relay - Sinks
//!
//! Output side of the relay. A sink turns one inbound log body into one
//! outbound message and delivers it without buffering.
//!
//! # Available Sinks
//!
//! | Sink | Purpose | Transport |
//! |------|---------|-----------|
//! | `syslog_udp` | BSD-style syslog datagrams | UDP, one socket per message |
//!
//! # Example
//!
//! ```ignore
//! use relay_sinks::syslog_udp::{SyslogMessage, SyslogTransport, UdpTransport};
//!
//! let transport = UdpTransport::new("127.0.0.1:4242");
//! let message = SyslogMessage::new(body);
//! transport.send(&message.to_datagram()).await?;
//! ```

/// Syslog UDP sink - RFC 3164 style messages over UDP
pub mod syslog_udp;
