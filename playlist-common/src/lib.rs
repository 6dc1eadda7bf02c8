//! # Playlist Common Library
//!
//! Shared code for the playlist service crates:
//! - Track and status types
//! - Event types (`PlaylistEvent`)
//! - Configuration loading
//! - SQLite track store

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod track;

pub use error::{Error, Result};
pub use events::{PlaybackState, PlaylistEvent};
pub use track::{PlayerInfo, Track};
