//! HTTP server setup and routing
//!
//! Sets up the Axum router for track management, transport control and the
//! SSE streams.

use crate::api::{handlers, sse};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::playback::PlaybackEngine;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{Pool, Sqlite};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub engine: PlaybackEngine,
    pub db_pool: Pool<Sqlite>,
}

/// Build the router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Track management
        .route(
            "/tracks",
            post(handlers::create_track).get(handlers::list_tracks),
        )
        .route(
            "/tracks/:id",
            get(handlers::get_track)
                .put(handlers::update_track)
                .delete(handlers::delete_track),
        )
        // Transport control
        .route("/playback/play", post(handlers::play))
        .route("/playback/pause", post(handlers::pause))
        .route("/playback/next", post(handlers::next))
        .route("/playback/previous", post(handlers::previous))
        .route("/playback/status", get(handlers::status))
        // SSE
        .route("/playback/stream", get(sse::player_stream))
        .route("/events", get(sse::event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Run HTTP API server until `shutdown` resolves
pub async fn run(
    config: &Config,
    engine: PlaybackEngine,
    db_pool: Pool<Sqlite>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = create_router(AppContext { engine, db_pool });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    info!("HTTP server stopped");
    Ok(())
}
