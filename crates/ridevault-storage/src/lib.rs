//! Ridevault Storage Library
//!
//! Object-storage collaborator for the upload service: the credential issuer
//! trait, its S3 implementation, the browser POST-policy signer, and object
//! key construction.
//!
//! # Object key format
//!
//! Keys embed the upload id and a date partition for global uniqueness and
//! date-range queries:
//!
//! - **Session uploads**: `sessions/{session_id}/videos/{YYYYMMDD}/{upload_id}-{filename}`
//! - **Legacy uploads**: `videos/{YYYYMMDD}/{upload_id}-{filename}`
//!
//! Filenames are sanitized before they reach a key; key construction is
//! centralized in the `keys` module.

pub mod keys;
pub mod post_policy;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use keys::{legacy_scope, object_key, sanitize_file_name, session_scope};
pub use post_policy::{PostPolicyOptions, PostPolicySigner};
pub use s3::S3Issuer;
pub use traits::{CredentialIssuer, PresignedPost, StorageError, StorageResult};
