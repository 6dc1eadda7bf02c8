//! # Playlist Server Library (playlist-server)
//!
//! Playlist playback engine with an HTTP control interface.
//!
//! **Purpose:** Keep an ordered playlist with a cursor, advance elapsed time
//! while a track plays, and expose tracks, transport commands and status
//! over HTTP/SSE.
//!
//! **Architecture:** One `PlaybackEngine` behind a single async lock, a
//! cancellable time-advance task per playback session, and a SQLite track
//! store owned by the service layer.

pub mod api;
pub mod config;
pub mod error;
pub mod playback;

pub use config::{Args, Config};
pub use error::{Error, Result};
pub use playback::{PlaybackEngine, RemoveOutcome, TransportSnapshot};
