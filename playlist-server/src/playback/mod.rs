//! Playlist playback
//!
//! `playlist` holds the ordered entries, `engine` owns the transport and
//! `session` drives elapsed time while a track plays.

pub mod engine;
pub mod playlist;
mod session;

pub use engine::{PlaybackEngine, RemoveOutcome, TransportSnapshot, DEFAULT_TICK};
pub use playlist::{Entry, EntryHandle, Playlist};
