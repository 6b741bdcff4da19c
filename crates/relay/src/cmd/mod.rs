//! Command implementations for the http-to-syslog CLI

pub mod serve;
