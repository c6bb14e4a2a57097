//! Token minting for tests.

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use ridevault_api::auth::Claims;
use uuid::Uuid;

/// Test JWT secret (must match setup_test_app).
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Mint an HS256 token for the given role, expiring `exp_offset_secs` from
/// now (negative for an already-expired token).
pub fn mint_token(user_id: Uuid, role: &str, exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + exp_offset_secs,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to mint test token")
}

/// A valid trainer token for one hour.
pub fn trainer_token() -> String {
    mint_token(Uuid::new_v4(), "trainer", 3600)
}
