//! Application setup: database pool, collaborators, routes.

pub mod routes;
pub mod server;

use anyhow::Context;
use axum::Router;
use ridevault_core::{Config, UploadValidator};
use ridevault_db::PgUploadStore;
use ridevault_storage::S3Issuer;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtVerifier;
use crate::state::AppState;

/// Build the application state and router from configuration.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let issuer = S3Issuer::new(
        config.s3_bucket().to_string(),
        config.s3_region().to_string(),
        config.s3_endpoint().map(|e| e.to_string()),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to initialize S3 issuer: {}", e))?;

    let validator = UploadValidator::new(
        config.max_file_size_bytes(),
        config.allowed_extensions().to_vec(),
        config.allowed_content_types().to_vec(),
    );

    let state = Arc::new(AppState {
        validator,
        store: Arc::new(PgUploadStore::new(pool)),
        issuer: Arc::new(issuer),
        verifier: Arc::new(JwtVerifier::new(config.jwt_secret())),
        config,
    });

    let router = routes::build_router(state.clone())?;

    Ok((state, router))
}
