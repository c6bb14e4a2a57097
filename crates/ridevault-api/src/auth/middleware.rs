//! Gate middleware for session-scoped routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use ridevault_core::constants::AUTH_FALLBACK_HEADER;
use ridevault_core::AppError;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Extract the bearer token from the accepted header channels.
///
/// `X-Auth-Token` wins over `Authorization` because some intermediary proxies
/// strip or rewrite the standard header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTH_FALLBACK_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers()) {
        Some(token) => token,
        None => {
            tracing::debug!("Missing bearer token on session upload request");
            return HttpAppError(AppError::Unauthorized(
                "missing bearer token".to_string(),
            ))
            .into_response();
        }
    };

    match state.verifier.verify(&token).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}
