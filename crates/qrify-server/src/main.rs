//! Qrify server - generate and decode QR codes over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use qrify_server::{config, logging, routes, state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use logging::{LogConfig, LogFormat, LogPreset};
use state::AppState;

/// Qrify server - QR code generation, decoding and per-session history.
#[derive(Parser, Debug)]
#[command(name = "qrify-server")]
#[command(about = "HTTP API for generating and decoding QR codes")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config and environment
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the history database path
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "api=debug" or "decode=trace").
    /// Can be specified multiple times. Targets are prefixed with "qrify::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let preset = LogPreset::from_flags(cli.verbose, cli.debug, cli.trace, cli.quiet);
    logging::init(&LogConfig::new(preset, &cli.log_overrides, cli.log_format));

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    tracing::info!(
        target: "qrify::startup",
        "Loaded configuration (port: {}, origin: {}, db: {})",
        config.port,
        config.frontend_url,
        config.db_path.display()
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen address")?;

    let state = Arc::new(AppState::new(config).context("opening history store")?);
    let app = routes::router(state)?;

    tracing::info!(target: "qrify::startup", "Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(target: "qrify::startup", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "qrify::startup", "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
