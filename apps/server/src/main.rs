//! Patient Server - Web Server Entry Point

use anyhow::Context;
use clap::Parser;
use patient_manager::{
    api::{create_router, routes::ENDPOINTS},
    config::{Config, StoreBackend},
    logging,
    state::AppState,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "patient-server", version, about = "Patient record HTTP service")]
struct Cli {
    /// Configuration file (toml, yaml or json)
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Keep patients in memory instead of PostgreSQL
    #[clap(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.in_memory {
        config.database.backend = StoreBackend::Memory;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _telemetry_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging/telemetry")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.logging.deployment_environment,
        "Starting patient server"
    );

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;

    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;

    tracing::info!("Server patient-manager listening at http://{}", addr);
    for (name, method, path) in ENDPOINTS {
        tracing::info!("   {name} (method: {method}) => http://{addr}{path}");
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server terminated unexpectedly");
        return Err(e.into());
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to install SIGTERM signal handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, starting graceful shutdown...");
        }
        _ = sigterm.recv() => {
            tracing::info!("SIGTERM received, starting graceful shutdown...");
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
