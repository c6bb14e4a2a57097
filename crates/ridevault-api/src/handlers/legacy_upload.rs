//! Legacy upload initiation.
//!
//! Single-shot browser POST against a signed policy. No session context and
//! no authorization gate on this path; the student and training date are
//! carried in the body and validated. Owner metadata rides on the object
//! itself so the upload stays attributable even without the database record.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use ridevault_core::models::{LegacyUploadData, LegacyUploadRequest, UploadMode, UploadStatus};
use ridevault_core::AppError;
use ridevault_db::UploadRecord;
use ridevault_storage::{keys, PostPolicyOptions};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ApiSuccess, HttpAppError, ScreenedJson};
use crate::retry::with_retry;
use crate::state::AppState;

pub async fn initiate_legacy_upload(
    State(state): State<Arc<AppState>>,
    ScreenedJson(request): ScreenedJson<LegacyUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.validator.validate_legacy(&request)?;

    // Validated as strict ISO above.
    let session_date = NaiveDate::parse_from_str(&request.session_date, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput("Session date must be YYYY-MM-DD".to_string()))?;

    let upload_id = Uuid::new_v4();
    let now = Utc::now();
    let object_key = keys::object_key(
        &keys::legacy_scope(),
        now.date_naive(),
        upload_id,
        &request.file_name,
    );

    let expiry_secs = state.config.presigned_url_expiry_secs();
    let expires_in = Duration::from_secs(expiry_secs);
    let expires_at = now + chrono::Duration::seconds(expiry_secs as i64);

    let mut metadata = BTreeMap::new();
    metadata.insert("x-amz-meta-upload-id".to_string(), upload_id.to_string());
    metadata.insert(
        "x-amz-meta-student-email".to_string(),
        request.student_email.clone(),
    );

    let options = PostPolicyOptions {
        content_type: request.content_type.to_lowercase(),
        content_type_prefix: "video/".to_string(),
        content_length_range: (0, state.config.max_file_size_bytes()),
        metadata,
    };

    let policy = state.retry_policy();
    let presigned = with_retry("presign_post", policy, || async {
        state
            .issuer
            .presign_post(&object_key, options.clone(), expires_in)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    })
    .await?;

    let record = UploadRecord {
        upload_id,
        session_id: None,
        uploader_id: None,
        uploader_role: None,
        student_email: Some(request.student_email.clone()),
        student_name: request.student_name.clone(),
        trainer_name: request.trainer_name.clone(),
        session_date: Some(session_date),
        notes: request.notes.clone(),
        original_file_name: request.file_name.clone(),
        stored_file_name: keys::sanitize_file_name(&request.file_name),
        file_size: request.file_size as i64,
        content_type: request.content_type.to_lowercase(),
        object_key: object_key.clone(),
        bucket: state.config.s3_bucket().to_string(),
        upload_mode: UploadMode::PresignedPost,
        chunk_size: None,
        status: UploadStatus::Pending,
        error_message: None,
        download_count: 0,
        created_at: now,
        retain_until: now + chrono::Duration::days(state.config.record_retention_days()),
    };

    // Same failure policy as the session path: no record, no credential.
    with_retry("create_upload_record", policy, || async {
        state.store.create(&record).await
    })
    .await?;

    tracing::info!(
        upload_id = %upload_id,
        student_email = %request.student_email,
        session_date = %session_date,
        file_name = %request.file_name,
        file_size = request.file_size,
        "Issued legacy upload credential"
    );

    Ok(Json(ApiSuccess::new(LegacyUploadData {
        file_id: upload_id,
        upload_url: presigned.url,
        fields: presigned.fields,
        expires_at,
    })))
}
