//! Ridevault API Library
//!
//! HTTP surface of the upload service: route dispatch, the authorization
//! gate, upload initiation handlers, and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod retry;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ApiSuccess, ErrorResponse};
pub use state::AppState;
