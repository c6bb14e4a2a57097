//! Upload protocol models: request bodies, response payloads, and the
//! mode/status enums threaded through issuance and persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// How the client transfers bytes to object storage.
///
/// Resolved once at the route dispatcher and threaded explicitly through
/// validation, issuance, and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    /// Session path: chunked transfer against per-part presigned PUT URLs.
    Multipart,
    /// Legacy path: single-shot browser POST against a signed policy.
    PresignedPost,
}

impl UploadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadMode::Multipart => "multipart",
            UploadMode::PresignedPost => "presigned_post",
        }
    }
}

impl Display for UploadMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multipart" => Ok(UploadMode::Multipart),
            "presigned_post" => Ok(UploadMode::PresignedPost),
            other => Err(format!("unknown upload mode: {}", other)),
        }
    }
}

/// Lifecycle status of an upload record.
///
/// Records are created `pending` and moved to `completed` or `failed` by the
/// notification collaborator once the object-storage write is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Completed => "completed",
            UploadStatus::Failed => "failed",
        }
    }
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UploadStatus::Pending),
            "completed" => Ok(UploadStatus::Completed),
            "failed" => Ok(UploadStatus::Failed),
            other => Err(format!("unknown upload status: {}", other)),
        }
    }
}

/// Session-scoped upload initiation body.
///
/// Unknown fields are ignored for forward compatibility. Legacy clients send
/// the MIME type as `mimeType`; both spellings resolve to `content_type`
/// here so downstream components see a single canonical field.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionUploadRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// Declared file size in bytes
    pub file_size: u64,
    #[serde(alias = "mimeType")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
}

/// Legacy upload initiation body (no session context; identifies the student
/// and training date directly).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUploadRequest {
    #[validate(email(message = "Student email must be a valid email address"))]
    pub student_email: String,
    #[validate(length(max = 100, message = "Student name must be at most 100 characters"))]
    pub student_name: Option<String>,
    #[validate(length(max = 100, message = "Trainer name must be at most 100 characters"))]
    pub trainer_name: Option<String>,
    /// Training date, ISO `YYYY-MM-DD`
    pub session_date: String,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    pub file_size: u64,
    #[serde(alias = "mimeType")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
}

/// One presigned PUT URL for a transfer part.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartUploadUrl {
    /// Part number (1-based, matching transfer order)
    pub part_number: u32,
    pub url: String,
}

/// Credential payload for a session (multipart) upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUploadData {
    pub upload_id: Uuid,
    /// Base URL of the target object
    pub upload_url: String,
    /// Planned transfer chunk size in bytes
    pub chunk_size: u64,
    pub expires_at: DateTime<Utc>,
    /// Presigned PUT URL per part, all scoped to the same object key
    pub part_urls: Vec<PartUploadUrl>,
}

/// Credential payload for a legacy (presigned POST) upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyUploadData {
    pub file_id: Uuid,
    /// Form action URL for the browser POST
    pub upload_url: String,
    /// Form fields the client must submit verbatim alongside the file
    pub fields: BTreeMap<String, String>,
    pub expires_at: DateTime<Utc>,
}
