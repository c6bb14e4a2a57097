//! Ridevault Core Library
//!
//! This crate provides the domain models, error types, configuration, request
//! validation, and chunk-size planning shared across all Ridevault components.

pub mod chunk;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use chunk::{part_count, plan_chunk_size};
pub use config::{BaseConfig, Config, UploadServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use validation::{UploadValidator, ValidationError};
