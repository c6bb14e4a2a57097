//! Token verification capability.
//!
//! Verification is delegated through the `TokenVerifier` trait so the gate's
//! policy (when to verify, how failures surface) stays independent of the
//! credential format. The JWT implementation keeps the expired/malformed
//! distinction in internal logs only; callers always see one uniform
//! `Unauthorized` outcome.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use ridevault_core::AppError;

use crate::auth::models::{AuthContext, Claims, UserRole};

/// Identity verification capability.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthContext, AppError>;
}

/// HS256 JWT verifier
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    fn parse_role(role: &str) -> Result<UserRole, AppError> {
        match role {
            "admin" => Ok(UserRole::Admin),
            "trainer" => Ok(UserRole::Trainer),
            "student" => Ok(UserRole::Student),
            other => Err(AppError::Unauthorized(format!(
                "unknown role in token: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthContext, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                // Internal logging keeps the distinction; the client does not.
                let reason = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "token has expired",
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => "invalid token signature",
                    jsonwebtoken::errors::ErrorKind::InvalidToken => "malformed token",
                    _ => "token verification failed",
                };
                tracing::debug!(reason = reason, error = %e, "JWT verification failed");
                AppError::Unauthorized(reason.to_string())
            })?;

        let role = Self::parse_role(&token_data.claims.role)?;

        Ok(AuthContext {
            user_id: token_data.claims.sub,
            role,
        })
    }
}
