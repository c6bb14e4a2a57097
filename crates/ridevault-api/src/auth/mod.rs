//! Authorization gate for session-scoped uploads.
//!
//! Token extraction and the verification capability live here; the gate is
//! layered onto session routes only, strictly before body validation, so
//! unauthenticated callers never reach validation-error messages.

pub mod middleware;
pub mod models;
pub mod verifier;

pub use models::{AuthContext, Claims, UserRole};
pub use verifier::{JwtVerifier, TokenVerifier};
