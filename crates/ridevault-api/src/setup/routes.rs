//! Route configuration.
//!
//! The dispatcher resolves the upload mode once from the path shape: the
//! session path runs behind the authorization gate, the legacy path does
//! not, CORS preflight is terminal at the CORS layer, and everything else
//! falls through to a structured 404.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use ridevault_core::Config;

/// Initiation bodies are small JSON documents.
const MAX_INITIATION_BODY_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn build_router(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;

    // Gate strictly before validation: unauthenticated callers never reach
    // the session body checks.
    let session_routes = Router::new()
        .route(
            "/sessions/{session_id}/upload",
            post(handlers::session_upload::initiate_session_upload),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let legacy_routes = Router::new().route(
        "/uploads/initiate",
        post(handlers::legacy_upload::initiate_legacy_upload),
    );

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(session_routes)
        .merge(legacy_routes)
        .fallback(handlers::not_found)
        .layer(RequestBodyLimitLayer::new(MAX_INITIATION_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins().iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
