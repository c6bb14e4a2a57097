//! Session-scoped upload initiation.
//!
//! Chunked transfers via per-part presigned URLs. The gate middleware has
//! already resolved the caller before the body is read; from there the flow
//! is validate, plan the chunk size, issue the credential, persist the
//! record, respond. Issuance and persistence are one logical unit: if the
//! record write fails the caller never sees the credential, which then
//! expires unused.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use ridevault_core::models::{
    PartUploadUrl, SessionUploadData, SessionUploadRequest, UploadMode, UploadStatus,
};
use ridevault_core::{chunk, AppError};
use ridevault_db::UploadRecord;
use ridevault_storage::keys;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ApiSuccess, HttpAppError, ScreenedJson};
use crate::retry::with_retry;
use crate::state::AppState;

pub async fn initiate_session_upload(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(session_id): Path<Uuid>,
    ScreenedJson(request): ScreenedJson<SessionUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.validator.validate_session(&request)?;

    let chunk_size = chunk::plan_chunk_size(request.file_size);
    let part_count = chunk::part_count(request.file_size, chunk_size)?;

    let upload_id = Uuid::new_v4();
    let now = Utc::now();
    let object_key = keys::object_key(
        &keys::session_scope(session_id),
        now.date_naive(),
        upload_id,
        &request.file_name,
    );

    let expiry_secs = state.config.presigned_url_expiry_secs();
    let expires_in = Duration::from_secs(expiry_secs);
    let expires_at = now + chrono::Duration::seconds(expiry_secs as i64);

    let policy = state.retry_policy();
    let part_urls = with_retry("presign_part_urls", policy, || async {
        state
            .issuer
            .presign_part_urls(&object_key, &request.content_type, part_count, expires_in)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    })
    .await?;

    let record = UploadRecord {
        upload_id,
        session_id: Some(session_id),
        uploader_id: Some(auth.user_id),
        uploader_role: Some(auth.role.to_string()),
        student_email: None,
        student_name: None,
        trainer_name: None,
        session_date: None,
        notes: None,
        original_file_name: request.file_name.clone(),
        stored_file_name: keys::sanitize_file_name(&request.file_name),
        file_size: request.file_size as i64,
        content_type: request.content_type.to_lowercase(),
        object_key: object_key.clone(),
        bucket: state.config.s3_bucket().to_string(),
        upload_mode: UploadMode::Multipart,
        chunk_size: Some(chunk_size as i64),
        status: UploadStatus::Pending,
        error_message: None,
        download_count: 0,
        created_at: now,
        retain_until: now + chrono::Duration::days(state.config.record_retention_days()),
    };

    // Record write failure fails the whole operation; the issued part URLs
    // are discarded and expire on their own.
    with_retry("create_upload_record", policy, || async {
        state.store.create(&record).await
    })
    .await?;

    tracing::info!(
        upload_id = %upload_id,
        session_id = %session_id,
        user_id = %auth.user_id,
        role = %auth.role,
        file_name = %request.file_name,
        file_size = request.file_size,
        chunk_size = chunk_size,
        part_count = part_count,
        "Issued session upload credential"
    );

    Ok(Json(ApiSuccess::new(SessionUploadData {
        upload_id,
        upload_url: state.issuer.object_url(&object_key),
        chunk_size,
        expires_at,
        part_urls: part_urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| PartUploadUrl {
                part_number: i as u32 + 1,
                url,
            })
            .collect(),
    })))
}
