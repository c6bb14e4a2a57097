//! Application state.
//!
//! Holds the three collaborator capabilities (durable store, credential
//! issuer, token verifier) behind trait objects plus the request validator
//! and configuration. No mutable state lives here; every request is handled
//! independently.

use ridevault_core::{Config, UploadValidator};
use ridevault_db::UploadStore;
use ridevault_storage::CredentialIssuer;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::verifier::TokenVerifier;
use crate::retry::RetryPolicy;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub validator: UploadValidator,
    pub store: Arc<dyn UploadStore>,
    pub issuer: Arc<dyn CredentialIssuer>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Timeout and retry budget applied to each downstream collaborator call.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.config.downstream_retry_attempts(),
            timeout: Duration::from_secs(self.config.downstream_timeout_secs()),
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
