//! Upload request validation.
//!
//! Pure validation: every failure is returned as a `ValidationError` value so
//! the dispatcher can always produce a structured 4xx response. Messages for
//! ordinary failures are specific enough for client developers to
//! self-correct.

use crate::constants::MIN_FILE_SIZE_BYTES;
use crate::models::{LegacyUploadRequest, SessionUploadRequest};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use validator::Validate;

/// Validation errors for upload initiation requests
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}")]
    Shape(String),

    #[error("File name may contain only letters, digits, spaces, and . _ ( ) - characters")]
    InvalidFileName,

    #[error("File extension '{extension}' is not allowed (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Content type '{content_type}' is not allowed (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File size must be between {min} and {max} bytes (got {size})")]
    FileSizeOutOfRange { size: u64, min: u64, max: u64 },

    #[error("Session date must be a valid calendar date in YYYY-MM-DD format")]
    InvalidSessionDate,
}

/// File name charset: letters, digits, spaces, dot, underscore, parens,
/// hyphen. Path separators and control characters fall outside this set and
/// are rejected by the same check.
fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9 ._()\-]{1,255}$").expect("valid regex"))
}

/// Upload request validator, configured with the size bound and allowlists.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|c| c.to_lowercase())
                .collect(),
        }
    }

    /// Validate a session-scoped upload request.
    pub fn validate_session(&self, request: &SessionUploadRequest) -> Result<(), ValidationError> {
        request.validate().map_err(shape_error)?;
        self.validate_file_name(&request.file_name)?;
        self.validate_content_type(&request.content_type)?;
        self.validate_file_size(request.file_size)?;
        Ok(())
    }

    /// Validate a legacy upload request.
    pub fn validate_legacy(&self, request: &LegacyUploadRequest) -> Result<(), ValidationError> {
        request.validate().map_err(shape_error)?;
        validate_session_date(&request.session_date)?;
        self.validate_file_name(&request.file_name)?;
        self.validate_content_type(&request.content_type)?;
        self.validate_file_size(request.file_size)?;
        Ok(())
    }

    fn validate_file_name(&self, file_name: &str) -> Result<(), ValidationError> {
        if !file_name_pattern().is_match(file_name) {
            return Err(ValidationError::InvalidFileName);
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .ok_or(ValidationError::InvalidFileName)?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();
        if !self.allowed_content_types.contains(&normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }
        Ok(())
    }

    fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size < MIN_FILE_SIZE_BYTES || size > self.max_file_size {
            return Err(ValidationError::FileSizeOutOfRange {
                size,
                min: MIN_FILE_SIZE_BYTES,
                max: self.max_file_size,
            });
        }
        Ok(())
    }
}

/// Strict ISO date: `chrono` rejects impossible dates like 2025-13-45.
fn validate_session_date(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidSessionDate)
}

/// Flatten derive-level validation errors into one field-specific message.
fn shape_error(errors: validator::ValidationErrors) -> ValidationError {
    let message = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid request body".to_string());
    ValidationError::Shape(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(
            5 * 1024 * 1024 * 1024,
            vec!["mp4".into(), "mov".into(), "avi".into(), "mkv".into()],
            vec![
                "video/mp4".into(),
                "video/quicktime".into(),
                "video/x-msvideo".into(),
                "video/x-matroska".into(),
            ],
        )
    }

    fn session_request(file_name: &str, file_size: u64, content_type: &str) -> SessionUploadRequest {
        SessionUploadRequest {
            file_name: file_name.to_string(),
            file_size,
            content_type: content_type.to_string(),
        }
    }

    fn legacy_request() -> LegacyUploadRequest {
        LegacyUploadRequest {
            student_email: "student@example.com".to_string(),
            student_name: Some("Alex".to_string()),
            trainer_name: None,
            session_date: "2025-06-14".to_string(),
            notes: None,
            file_name: "session.mp4".to_string(),
            file_size: 10 * 1024 * 1024,
            content_type: "video/mp4".to_string(),
        }
    }

    #[test]
    fn test_valid_session_request() {
        let validator = test_validator();
        let request = session_request("lesson1.mp4", 10_485_760, "video/mp4");
        assert!(validator.validate_session(&request).is_ok());
    }

    #[test]
    fn test_all_whitelisted_content_types_pass() {
        let validator = test_validator();
        for ct in [
            "video/mp4",
            "video/quicktime",
            "video/x-msvideo",
            "video/x-matroska",
        ] {
            let request = session_request("a.mp4", 2048, ct);
            assert!(validator.validate_session(&request).is_ok(), "{}", ct);
        }
    }

    #[test]
    fn test_content_type_outside_whitelist_rejected() {
        let validator = test_validator();
        let request = session_request("a.mp4", 2048, "application/octet-stream");
        assert!(matches!(
            validator.validate_session(&request),
            Err(ValidationError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_extension_mismatch_rejected() {
        let validator = test_validator();
        let request = session_request("lesson1.txt", 10_485_760, "video/mp4");
        assert!(matches!(
            validator.validate_session(&request),
            Err(ValidationError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let validator = test_validator();
        let request = session_request("lesson1.MP4", 10_485_760, "video/mp4");
        assert!(validator.validate_session(&request).is_ok());
    }

    #[test]
    fn test_path_separators_rejected() {
        let validator = test_validator();
        for name in ["../../etc/passwd.mp4", "a/b.mp4", "a\\b.mp4"] {
            let request = session_request(name, 2048, "video/mp4");
            assert!(
                matches!(
                    validator.validate_session(&request),
                    Err(ValidationError::InvalidFileName)
                ),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_control_characters_rejected() {
        let validator = test_validator();
        let request = session_request("bad\u{0}name.mp4", 2048, "video/mp4");
        assert!(validator.validate_session(&request).is_err());
    }

    #[test]
    fn test_file_size_bounds() {
        let validator = test_validator();
        for size in [0u64, 1, 1023] {
            let request = session_request("a.mp4", size, "video/mp4");
            let err = validator.validate_session(&request).unwrap_err();
            assert!(
                matches!(err, ValidationError::FileSizeOutOfRange { .. }),
                "size {} should be rejected",
                size
            );
            assert!(err.to_string().contains("1024"));
        }

        let over = session_request("a.mp4", 5 * 1024 * 1024 * 1024 + 1, "video/mp4");
        assert!(matches!(
            validator.validate_session(&over),
            Err(ValidationError::FileSizeOutOfRange { .. })
        ));

        let at_min = session_request("a.mp4", 1024, "video/mp4");
        assert!(validator.validate_session(&at_min).is_ok());
    }

    #[test]
    fn test_valid_legacy_request() {
        let validator = test_validator();
        assert!(validator.validate_legacy(&legacy_request()).is_ok());
    }

    #[test]
    fn test_legacy_invalid_email_rejected() {
        let validator = test_validator();
        let mut request = legacy_request();
        request.student_email = "not-an-email".to_string();
        assert!(matches!(
            validator.validate_legacy(&request),
            Err(ValidationError::Shape(_))
        ));
    }

    #[test]
    fn test_legacy_impossible_date_rejected() {
        let validator = test_validator();
        let mut request = legacy_request();
        request.session_date = "2025-13-45".to_string();
        let err = validator.validate_legacy(&request).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSessionDate));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_legacy_wrong_date_shape_rejected() {
        let validator = test_validator();
        for date in ["14-06-2025", "2025/06/14", "June 14 2025", ""] {
            let mut request = legacy_request();
            request.session_date = date.to_string();
            assert!(validator.validate_legacy(&request).is_err(), "{}", date);
        }
    }

    #[test]
    fn test_legacy_notes_length_cap() {
        let validator = test_validator();
        let mut request = legacy_request();
        request.notes = Some("x".repeat(1001));
        assert!(matches!(
            validator.validate_legacy(&request),
            Err(ValidationError::Shape(_))
        ));

        request.notes = Some("x".repeat(1000));
        assert!(validator.validate_legacy(&request).is_ok());
    }

    #[test]
    fn test_legacy_name_length_cap() {
        let validator = test_validator();
        let mut request = legacy_request();
        request.student_name = Some("x".repeat(101));
        assert!(validator.validate_legacy(&request).is_err());
    }
}
