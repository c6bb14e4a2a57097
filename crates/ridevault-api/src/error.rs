//! HTTP error response conversion and the screened JSON extractor.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors so they
//! render consistently (status, body, logging). The dispatcher is the single
//! point where downstream failures become structured responses; internal
//! detail never reaches the client for sensitive failures.

use axum::{
    extract::{FromRequest, Request},
    http::{header::USER_AGENT, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use ridevault_core::validation::{find_injection_signature, is_suspicious_user_agent};
use ridevault_core::{AppError, ErrorMetadata, LogLevel, ValidationError};
use serde::{de::DeserializeOwned, Serialize};

/// Upper bound for an upload-initiation body. These are small JSON documents;
/// anything larger is not a legitimate initiation request.
const MAX_INITIATION_BODY_BYTES: usize = 64 * 1024;

/// Success envelope: `{"success":true,"data":{...}}`.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope: `{"success":false,"error":...}` plus machine-readable
/// fields for programmatic handling.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            recoverable: false,
            suggested_action: None,
            details: None,
            error_type: None,
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse.
/// Necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (type from ridevault-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(AppError::InvalidInput(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let is_production = is_production_env();

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Hide details in production; outside production, only show details
        // for non-sensitive errors.
        let mut body = ErrorResponse {
            success: false,
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
            details: None,
            error_type: None,
        };
        if !is_production && !app_error.is_sensitive() {
            body.details = Some(app_error.detailed_message());
            body.error_type = Some(app_error.error_type().to_string());
        }

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor that screens the raw payload before deserialization.
///
/// Order matters: the bot User-Agent check and injection-signature scan run
/// against the raw bytes first, so suspicious payloads are rejected with a
/// generic message before any field-level parsing can leak structure back to
/// the caller. Unknown fields are ignored at the serde layer.
#[derive(Debug, Clone, Copy)]
pub struct ScreenedJson<T>(pub T);

impl<T, S> FromRequest<S> for ScreenedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user_agent) = req.headers().get(USER_AGENT).and_then(|h| h.to_str().ok()) {
            if is_suspicious_user_agent(user_agent) {
                return Err(HttpAppError(AppError::SecurityRejection(format!(
                    "user agent matched crawler pattern: {}",
                    user_agent
                ))));
            }
        }

        let bytes = axum::body::to_bytes(req.into_body(), MAX_INITIATION_BODY_BYTES)
            .await
            .map_err(|_| {
                HttpAppError(AppError::InvalidInput(
                    "Request body is too large or unreadable".to_string(),
                ))
            })?;

        let raw = std::str::from_utf8(&bytes).map_err(|_| {
            HttpAppError(AppError::InvalidInput(
                "Request body must be valid UTF-8".to_string(),
            ))
        })?;

        if let Some(rule) = find_injection_signature(raw) {
            return Err(HttpAppError(AppError::SecurityRejection(format!(
                "payload matched injection signature: {}",
                rule
            ))));
        }

        let inner: T = serde_json::from_str(raw).map_err(|e| {
            HttpAppError(AppError::InvalidInput(format!(
                "Invalid request body: {}",
                e
            )))
        })?;

        Ok(ScreenedJson(inner))
    }
}
