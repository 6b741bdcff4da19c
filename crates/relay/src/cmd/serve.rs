//! Serve command - Run the relay
//!
//! Binds the HTTP listener and relays every request body to the syslog
//! destination until SIGINT or SIGTERM.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use relay_config::Config;
use relay_sinks::syslog_udp::UdpTransport;
use relay_sources::{HttpRelaySource, HttpSourceConfig, HttpSourceError};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Config files tried, in order, when `--config` is not given
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["configs/config.toml", "config.toml"];

/// How long in-flight requests get to finish after a shutdown signal
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Serve command arguments
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// HTTP listen address (host:port). Overrides config file.
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Syslog UDP destination (host:port). Overrides config file.
    #[arg(short, long)]
    pub destination: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Configuration after file loading and command-line overrides
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from, `None` for built-in defaults
    pub path: Option<PathBuf>,
}

/// Resolve the effective configuration: CLI flag > config file > default
pub fn load(args: &ServeArgs) -> Result<LoadedConfig> {
    let defaults: Vec<PathBuf> = DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect();
    load_with_defaults(args, &defaults)
}

fn load_with_defaults(args: &ServeArgs, default_paths: &[PathBuf]) -> Result<LoadedConfig> {
    let (mut config, path) = match &args.config {
        Some(path) => {
            // User explicitly provided config path - must exist
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            (load_file(path)?, Some(path.clone()))
        }
        None => match default_paths.iter().find(|p| p.exists()) {
            Some(path) => (load_file(path)?, Some(path.clone())),
            None => (Config::default(), None),
        },
    };

    config.relay = config
        .relay
        .with_listen(args.listen.clone())
        .with_destination(args.destination.clone());
    config.validate().context("invalid configuration")?;

    Ok(LoadedConfig { config, path })
}

fn load_file(path: &Path) -> Result<Config> {
    Config::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Run the serve command
pub async fn run(loaded: LoadedConfig) -> Result<()> {
    let config_path = loaded
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        config = %config_path,
        "http-to-syslog starting"
    );

    if let Err(e) = run_server(&loaded.config).await {
        error!(error = %e, "server error");
        return Err(e);
    }

    info!("http-to-syslog shutdown complete");
    Ok(())
}

async fn run_server(config: &Config) -> Result<()> {
    let transport = Arc::new(UdpTransport::new(config.relay.destination.clone()));
    let source_config = HttpSourceConfig::with_listen(config.relay.listen.clone());

    let bound = HttpRelaySource::new(source_config, transport)
        .bind()
        .await
        .context("failed to start HTTP source")?;

    let cancel = CancellationToken::new();
    let mut server = tokio::spawn(bound.serve(cancel.clone()));

    tokio::select! {
        () = wait_for_shutdown() => {
            info!("shutdown signal received, stopping server...");
            cancel.cancel();
        }
        result = &mut server => {
            // Server exited on its own
            return join_result(result);
        }
    }

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(result) => join_result(result),
        Err(_) => {
            warn!(
                timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                "in-flight requests did not finish before shutdown timeout"
            );
            Ok(())
        }
    }
}

fn join_result(
    result: Result<Result<(), HttpSourceError>, tokio::task::JoinError>,
) -> Result<()> {
    result
        .context("HTTP source task failed")?
        .context("HTTP source error")
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
