//! Object key construction.
//!
//! Key format: `{scope}/{YYYYMMDD}/{upload_id}-{sanitized_filename}`. The
//! embedded upload id guarantees global uniqueness; the date partition makes
//! date-range listings cheap for the download and notification consumers.

use chrono::NaiveDate;
use uuid::Uuid;

/// Scope prefix for legacy uploads.
pub const LEGACY_SCOPE: &str = "videos";

/// Replace any character outside `[A-Za-z0-9.-]` with `-`.
pub fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Scope prefix for uploads belonging to a training session.
pub fn session_scope(session_id: Uuid) -> String {
    format!("sessions/{}/videos", session_id)
}

/// Scope prefix for legacy uploads.
pub fn legacy_scope() -> String {
    LEGACY_SCOPE.to_string()
}

/// Build the object key for an upload.
pub fn object_key(scope: &str, date: NaiveDate, upload_id: Uuid, file_name: &str) -> String {
    format!(
        "{}/{}/{}-{}",
        scope,
        date.format("%Y%m%d"),
        upload_id,
        sanitize_file_name(file_name)
    )
}
