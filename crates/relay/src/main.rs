//! http-to-syslog - relay HTTP request bodies to syslog over UDP
//!
//! # Usage
//!
//! ```bash
//! # Run the relay (default): :8888 -> 127.0.0.1:4242
//! http-to-syslog
//! http-to-syslog --listen 0.0.0.0:8080 --destination 10.0.0.5:514
//! http-to-syslog --config configs/config.toml
//!
//! # Send a few messages through a running relay
//! http-to-syslog test --server http://127.0.0.1:8888
//! ```

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use relay_config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// http-to-syslog - relay HTTP request bodies to syslog over UDP
#[derive(Parser, Debug)]
#[command(name = "http-to-syslog")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Serve args when no subcommand is given
    #[command(flatten)]
    serve: cmd::serve::ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the relay
    Serve(cmd::serve::ServeArgs),

    /// Send test messages through a running relay
    Test(cmd::test::TestArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(args)) => serve(args).await,
        Some(Command::Test(args)) => {
            // Test doesn't need logging - just outputs to stdout
            cmd::test::run(args).await
        }
        // No subcommand = run the relay (default behavior)
        None => serve(cli.serve).await,
    }
}

/// Load config, initialize logging, then run the relay
async fn serve(args: cmd::serve::ServeArgs) -> Result<()> {
    let loaded = cmd::serve::load(&args)?;

    // CLI flag > config file > default
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.config.log.level.as_str().to_string());
    init_logging(&log_level, loaded.config.log.format)?;

    cmd::serve::run(loaded).await
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Console => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init(),
    }

    Ok(())
}
