//! HTTP API
//!
//! REST endpoints for tracks and transport control plus SSE streams.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, run, AppContext};
