//! Syslog message formatting
//!
//! Wire layout (no trailing newline):
//!
//! ```text
//! <PRI>Mon DD HH:MM:SS HOSTNAME http-to-syslog: BODY
//! ```
//!
//! The body is appended byte-for-byte; nothing is escaped or validated.

use std::fmt;

use bytes::Bytes;
use chrono::{Local, NaiveDateTime};

/// Static tag identifying the relay in every message
pub const TAG: &str = "http-to-syslog";

/// Timestamp layout, e.g. `Jan 02 15:04:05`
pub const TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S";

/// Syslog priority (PRI) value: `facility * 8 + severity`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority(u8);

impl Priority {
    /// Facility `user` (1), severity `info` (6)
    pub const USER_INFO: Self = Self::new(1, 6);

    /// Build a priority from facility (0-23) and severity (0-7)
    ///
    /// Out-of-range inputs are clamped to the largest valid value.
    pub const fn new(facility: u8, severity: u8) -> Self {
        let facility = if facility > 23 { 23 } else { facility };
        let severity = if severity > 7 { 7 } else { severity };
        Self(facility * 8 + severity)
    }

    /// Numeric PRI value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Facility component
    pub const fn facility(self) -> u8 {
        self.0 / 8
    }

    /// Severity component
    pub const fn severity(self) -> u8 {
        self.0 % 8
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::USER_INFO
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// One formatted syslog message
#[derive(Debug, Clone)]
pub struct SyslogMessage {
    priority: Priority,
    timestamp: String,
    hostname: String,
    body: Bytes,
}

impl SyslogMessage {
    /// Build a `user.info` message stamped with the current local time and hostname
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self::with_parts(
            Priority::USER_INFO,
            Local::now().naive_local(),
            local_hostname(),
            body,
        )
    }

    /// Build a message from explicit parts
    pub fn with_parts(
        priority: Priority,
        timestamp: NaiveDateTime,
        hostname: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            priority,
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            hostname: hostname.into(),
            body: body.into(),
        }
    }

    /// Priority of this message
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Formatted timestamp
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Hostname written into the header
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Raw body bytes
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Header up to and including the space after the tag
    fn header(&self) -> String {
        format!(
            "{}{} {} {}: ",
            self.priority, self.timestamp, self.hostname, TAG
        )
    }

    /// Encode to the bytes of a single datagram
    pub fn to_datagram(&self) -> Vec<u8> {
        let header = self.header();
        let mut datagram = Vec::with_capacity(header.len() + self.body.len());
        datagram.extend_from_slice(header.as_bytes());
        datagram.extend_from_slice(&self.body);
        datagram
    }
}

impl fmt::Display for SyslogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header(), String::from_utf8_lossy(&self.body))
    }
}

/// Local hostname, or empty if it cannot be determined
fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::debug!(error = %e, "failed to read hostname");
            String::new()
        }
    }
}
