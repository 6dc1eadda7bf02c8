//! Playlist Server (playlist-server) - Main entry point
//!
//! Loads the stored tracks into a playback engine and serves the HTTP/SSE
//! control interface until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use playlist_common::db;
use playlist_server::{api, Args, Config, PlaybackEngine};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "playlist_server=debug,playlist_common=info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    let config = Config::load(&args).context("Failed to resolve configuration")?;

    // Initialize tracing: RUST_LOG, then config file log_level, then default
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .log_level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER)
            .into()
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting playlist-server v{} on port {}",
        env!("CARGO_PKG_VERSION"),
        config.port
    );
    info!("Database: {}", config.db_path.display());

    // Initialize database and load the stored ordering
    let db_pool = db::init_database(&config.db_path)
        .await
        .context("Failed to initialize database")?;
    let tracks = db::list_tracks(&db_pool)
        .await
        .context("Failed to load tracks")?;
    info!("Loaded {} tracks", tracks.len());

    // Initialize playback engine
    let engine = PlaybackEngine::with_tick(tracks, config.tick);

    api::run(&config, engine.clone(), db_pool.clone(), shutdown_signal())
        .await
        .context("Server error")?;

    // No session task may outlive the server
    engine.shutdown().await;
    db_pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
