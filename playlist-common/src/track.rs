//! Track and player status types
//!
//! `Track` is the unit stored in the database and admitted into the
//! playlist. `PlayerInfo` is the status message pushed to clients while a
//! track is playing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Largest duration the SQLite store can hold
pub const MAX_DURATION_SECONDS: u64 = i64::MAX as u64;

/// A playable track
///
/// The `id` is opaque to the playlist: ordering never depends on it and two
/// playlist entries may carry the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub duration_seconds: u64,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_seconds,
        }
    }

    /// Create a track with a freshly generated UUIDv4 id
    pub fn with_generated_id(title: impl Into<String>, duration_seconds: u64) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), title, duration_seconds)
    }

    /// Reject tracks that could never be played or stored
    ///
    /// A track needs a non-empty title and a non-zero duration that fits the
    /// store's signed integer column.
    pub fn validate_fields(title: &str, duration_seconds: u64) -> Result<()> {
        if title.is_empty() || duration_seconds == 0 {
            return Err(Error::InvalidInput(
                "empty title/duration==0".to_string(),
            ));
        }
        if duration_seconds > MAX_DURATION_SECONDS {
            return Err(Error::InvalidInput("duration too large".to_string()));
        }
        Ok(())
    }
}

/// Status of the track under the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub title: String,
    pub duration_seconds: u64,
    pub elapsed_seconds: u64,
}

/// Format seconds as `mm:ss`
fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

impl fmt::Display for PlayerInfo {
    /// Renders as `mm:ss/mm:ss - title` (elapsed / duration)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} - {}",
            format_clock(self.elapsed_seconds),
            format_clock(self.duration_seconds),
            self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fields_accepts_playable_track() {
        assert!(Track::validate_fields("Dave Brubeck Quartet - Take Five", 325).is_ok());
    }

    #[test]
    fn test_validate_fields_rejects_empty_title() {
        let err = Track::validate_fields("", 10).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: empty title/duration==0");
    }

    #[test]
    fn test_validate_fields_rejects_zero_duration() {
        assert!(matches!(
            Track::validate_fields("silence", 0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_fields_rejects_unstorable_duration() {
        assert!(Track::validate_fields("long", MAX_DURATION_SECONDS).is_ok());
        let err = Track::validate_fields("too long", u64::MAX).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: duration too large");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Track::with_generated_id("a", 1);
        let b = Track::with_generated_id("a", 1);
        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_player_info_display() {
        let info = PlayerInfo {
            title: "Dave Brubeck Quartet - Take Five".to_string(),
            duration_seconds: 325,
            elapsed_seconds: 7,
        };
        assert_eq!(info.to_string(), "00:07/05:25 - Dave Brubeck Quartet - Take Five");
    }

    #[test]
    fn test_player_info_display_long_track() {
        let info = PlayerInfo {
            title: "long".to_string(),
            duration_seconds: 6000,
            elapsed_seconds: 659,
        };
        assert_eq!(info.to_string(), "10:59/100:00 - long");
    }
}
