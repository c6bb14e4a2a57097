//! Request validation
//!
//! Shape and policy checks for upload initiation requests, plus the security
//! screening applied to raw payloads before deserialization.

pub mod request;
pub mod security;

pub use request::{UploadValidator, ValidationError};
pub use security::{find_injection_signature, is_suspicious_user_agent};
