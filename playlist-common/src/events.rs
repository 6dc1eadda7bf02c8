//! Event types for the playlist event bus
//!
//! Events are broadcast by the playback engine and serialized for SSE
//! transmission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport state of the playback engine
///
/// `Stopped` covers both "never started" and "finished the last track".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Playlist event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaylistEvent {
    /// Transport changed between playing, paused and stopped
    PlaybackStateChanged {
        old_state: PlaybackState,
        new_state: PlaybackState,
        timestamp: DateTime<Utc>,
    },

    /// A new playback session started on a track
    ///
    /// Emitted on first play, on every skip, and on auto-advance. Not
    /// emitted when resuming from pause.
    TrackStarted {
        track_id: String,
        title: String,
        duration_seconds: u64,
        timestamp: DateTime<Utc>,
    },

    /// The last track played to completion and the engine stopped
    PlaybackFinished {
        track_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A track was added to or removed from the playlist
    PlaylistChanged {
        /// Number of entries after the change
        length: usize,
        timestamp: DateTime<Utc>,
    },
}

impl PlaylistEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            PlaylistEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
            PlaylistEvent::TrackStarted { .. } => "TrackStarted",
            PlaylistEvent::PlaybackFinished { .. } => "PlaybackFinished",
            PlaylistEvent::PlaylistChanged { .. } => "PlaylistChanged",
        }
    }
}
