//! Credential issuer abstraction
//!
//! The upload handlers depend on this trait rather than on a concrete S3
//! client, so tests can substitute a deterministic issuer.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::post_policy::PostPolicyOptions;

/// Storage credential operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Credential signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage credential operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A signed browser POST credential: the form action URL plus the fields the
/// client must submit verbatim alongside the file.
#[derive(Debug, Clone)]
pub struct PresignedPost {
    pub url: String,
    pub fields: BTreeMap<String, String>,
}

/// Issues time-limited, single-object transfer credentials.
///
/// Every credential is bound to exactly one object key and expires
/// `expires_in` after issuance; the backend rejects transfers after that.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Start a multipart transfer and pre-sign one PUT URL per part.
    ///
    /// All part URLs are scoped to the same object key and share the
    /// credential expiry. Part numbers are 1-based.
    async fn presign_part_urls(
        &self,
        object_key: &str,
        content_type: &str,
        part_count: u32,
        expires_in: Duration,
    ) -> StorageResult<Vec<String>>;

    /// Sign a browser POST policy scoped to the given object key.
    async fn presign_post(
        &self,
        object_key: &str,
        options: PostPolicyOptions,
        expires_in: Duration,
    ) -> StorageResult<PresignedPost>;

    /// Public base URL of the object the credential targets.
    fn object_url(&self, object_key: &str) -> String;
}
