//! Database initialization and track store

pub mod init;
pub mod tracks;

pub use init::*;
pub use tracks::*;
