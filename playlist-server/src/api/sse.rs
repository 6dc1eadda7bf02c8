//! Server-Sent Events (SSE) streams
//!
//! - `GET /playback/stream` polls the engine once per tick and pushes the
//!   current `PlayerInfo` while a track is playing
//! - `GET /events` forwards the engine's event bus

use crate::api::server::AppContext;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use playlist_common::PlaylistEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

fn keep_alive() -> KeepAlive {
    KeepAlive::new()
        .interval(Duration::from_secs(15))
        .text("keep-alive")
}

/// GET /playback/stream - player status while playing
///
/// Nothing is sent while paused, stopped or without a cursor.
pub async fn player_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to player stream");

    let engine = ctx.engine;
    let stream = async_stream::stream! {
        let mut ticker = tokio::time::interval(engine.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let snapshot = engine.snapshot().await;
            if !snapshot.state.is_playing() {
                continue;
            }
            let Some(info) = snapshot.current else {
                continue;
            };

            match serde_json::to_string(&info) {
                Ok(json) => {
                    yield Ok(Event::default().event("PlayerInfo").data(json));
                }
                Err(e) => warn!("Failed to serialize player info: {}", e),
            }
        }
    };

    Sse::new(stream).keep_alive(keep_alive())
}

/// GET /events - SSE event stream
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected to event stream");

    let stream = BroadcastStream::new(ctx.engine.subscribe()).filter_map(|result| async move {
        match result {
            Ok(event) => to_sse_event(&event).map(Ok),
            Err(e) => {
                // Lagged receivers skip ahead
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(keep_alive())
}

fn to_sse_event(event: &PlaylistEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => {
            debug!("Broadcasting SSE event: {}", event.event_type());
            Some(Event::default().event(event.event_type()).data(json))
        }
        Err(e) => {
            warn!("Failed to serialize event: {}", e);
            None
        }
    }
}
