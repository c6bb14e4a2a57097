//! Shared constants for upload policy and header channels.

/// Smallest accepted upload, in bytes. Anything below this is noise.
pub const MIN_FILE_SIZE_BYTES: u64 = 1024;

/// Default upper bound for a single upload (5 GiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Default lifetime of an issued credential, in seconds (1 hour).
pub const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Default retention window for upload records, in days.
pub const DEFAULT_RECORD_RETENTION_DAYS: i64 = 90;

/// Ceiling on the number of transfer parts for one upload.
pub const MAX_PART_COUNT: u32 = 10_000;

/// Fallback header channel for the bearer token. Takes precedence over
/// `Authorization` because some intermediary proxies rewrite that header.
pub const AUTH_FALLBACK_HEADER: &str = "x-auth-token";

/// Video file extensions accepted for upload.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

/// Video content types accepted for upload.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
];
