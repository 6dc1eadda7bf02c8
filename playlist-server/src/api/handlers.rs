//! HTTP request handlers
//!
//! Track management keeps the store and the in-memory playlist in step:
//! create appends to both, delete removes from both. Transport commands are
//! forwarded to the engine and always acknowledged.

use crate::api::server::AppContext;
use crate::error::Error;
use crate::playback::{RemoveOutcome, TransportSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use playlist_common::{db, Track};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuccessResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub track: Track,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackListResponse {
    pub tracks: Vec<Track>,
}

type ApiError = (StatusCode, Json<StatusResponse>);

fn log_failure(err: &Error) {
    if err.status_code().is_server_error() {
        error!("{}", err);
    } else {
        debug!("{}", err);
    }
}

/// Map a service error onto a client response
fn reject(err: Error) -> ApiError {
    log_failure(&err);
    (
        err.status_code(),
        Json(StatusResponse {
            status: err.client_message(),
        }),
    )
}

fn reject_delete(err: Error) -> (StatusCode, Json<SuccessResponse>) {
    log_failure(&err);
    (
        err.status_code(),
        Json(SuccessResponse::failed(err.client_message())),
    )
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "playlist_server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Track Endpoints
// ============================================================================

/// POST /tracks - Store a new track and append it to the playlist
pub async fn create_track(
    State(ctx): State<AppContext>,
    Json(req): Json<TrackRequest>,
) -> Result<(StatusCode, Json<TrackResponse>), ApiError> {
    if let Err(e) = Track::validate_fields(&req.title, req.duration_seconds) {
        return Err(reject(Error::store("create song", e)));
    }

    let track = Track::with_generated_id(req.title, req.duration_seconds);
    db::insert_track(&ctx.db_pool, &track)
        .await
        .map_err(|e| reject(Error::store("create song", e)))?;

    ctx.engine.add(track.clone()).await;
    info!(track_id = %track.id, "Created track \"{}\"", track.title);

    Ok((StatusCode::CREATED, Json(TrackResponse { track })))
}

/// GET /tracks - List stored tracks in playlist order
pub async fn list_tracks(
    State(ctx): State<AppContext>,
) -> Result<Json<TrackListResponse>, ApiError> {
    let tracks = db::list_tracks(&ctx.db_pool)
        .await
        .map_err(|e| reject(Error::store("get songs", e)))?;

    if tracks.is_empty() {
        return Err(reject(Error::NotFound("songs not found".to_string())));
    }

    Ok(Json(TrackListResponse { tracks }))
}

/// GET /tracks/:id - Read one stored track
pub async fn get_track(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<TrackResponse>, ApiError> {
    let track = db::get_track(&ctx.db_pool, &id)
        .await
        .map_err(|e| reject(Error::store("get song", e)))?;

    Ok(Json(TrackResponse { track }))
}

/// PUT /tracks/:id - Update title and duration in the store
///
/// The playlist keeps the track as it was when added.
pub async fn update_track(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    if let Err(e) = Track::validate_fields(&req.title, req.duration_seconds) {
        return Err(reject(Error::store("update song", e)));
    }

    let track = db::update_track(&ctx.db_pool, &id, &req.title, req.duration_seconds)
        .await
        .map_err(|e| reject(Error::store("update song", e)))?;

    info!(track_id = %id, "Updated track");
    Ok(Json(TrackResponse { track }))
}

/// DELETE /tracks/:id - Delete a track from the playlist and the store
///
/// Refused with 409 while the track is playing. The playlist decides that
/// under its own lock, so the store row is only deleted once the entry is
/// gone from the playlist.
pub async fn delete_track(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<SuccessResponse>)> {
    match ctx.engine.remove(&id).await {
        RemoveOutcome::CurrentlyPlaying => {
            return Err(reject_delete(Error::Conflict(
                "delete error: song is currently playing".to_string(),
            )));
        }
        RemoveOutcome::Removed => debug!(track_id = %id, "Removed track from playlist"),
        RemoveOutcome::NotFound => debug!(track_id = %id, "Track not in playlist"),
    }

    if let Err(e) = db::delete_track(&ctx.db_pool, &id).await {
        return Err(reject_delete(Error::store("delete", e)));
    }

    info!(track_id = %id, "Deleted track");
    Ok(Json(SuccessResponse::ok()))
}

// ============================================================================
// Playback Endpoints
// ============================================================================

/// POST /playback/play
pub async fn play(State(ctx): State<AppContext>) -> Json<SuccessResponse> {
    ctx.engine.play().await;
    Json(SuccessResponse::ok())
}

/// POST /playback/pause
pub async fn pause(State(ctx): State<AppContext>) -> Json<SuccessResponse> {
    ctx.engine.pause().await;
    Json(SuccessResponse::ok())
}

/// POST /playback/next
pub async fn next(State(ctx): State<AppContext>) -> Json<SuccessResponse> {
    ctx.engine.next().await;
    Json(SuccessResponse::ok())
}

/// POST /playback/previous
pub async fn previous(State(ctx): State<AppContext>) -> Json<SuccessResponse> {
    ctx.engine.previous().await;
    Json(SuccessResponse::ok())
}

/// GET /playback/status - Transport state, playlist length and current track
pub async fn status(State(ctx): State<AppContext>) -> Json<TransportSnapshot> {
    Json(ctx.engine.snapshot().await)
}
