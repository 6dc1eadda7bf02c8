//! Error types for playlist-server
//!
//! Defines service-level errors using thiserror and maps them onto HTTP
//! status codes for the API layer.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for playlist-server
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file or argument errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with the current playback state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store or other server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify a track store failure for `action` (e.g. "create song")
    pub fn store(action: &str, e: playlist_common::Error) -> Self {
        match e {
            playlist_common::Error::NotFound(_) => Error::NotFound("song not found".to_string()),
            playlist_common::Error::InvalidInput(reason) => {
                Error::BadRequest(format!("{} error: {}", action, reason))
            }
            other => Error::Internal(format!("{} error: {}", action, other)),
        }
    }

    /// HTTP status reported to API clients
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Config(_) | Error::Http(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to API clients
    ///
    /// Client errors carry their text verbatim; server errors keep the
    /// category prefix.
    pub fn client_message(&self) -> String {
        match self {
            Error::NotFound(message) | Error::BadRequest(message) | Error::Conflict(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Convenience Result type using playlist-server Error
pub type Result<T> = std::result::Result<T, Error>;
