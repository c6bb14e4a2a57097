//! HTTP handlers

pub mod health;
pub mod legacy_upload;
pub mod session_upload;

use crate::error::HttpAppError;
use ridevault_core::AppError;

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Route not found".to_string()))
}
