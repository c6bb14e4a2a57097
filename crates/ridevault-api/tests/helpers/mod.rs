//! Test helpers: build AppState and router for integration tests.
//!
//! The durable store and credential issuer are swapped for deterministic
//! in-memory implementations; token verification uses the real HS256
//! verifier with a test secret. Run with `cargo test -p ridevault-api`.

pub mod auth;
pub mod issuer;
pub mod store;

use axum_test::TestServer;
use ridevault_api::auth::JwtVerifier;
use ridevault_api::setup::routes;
use ridevault_api::state::AppState;
use ridevault_core::{BaseConfig, Config, UploadServiceConfig, UploadValidator};
use std::sync::Arc;

/// Test application: server plus a handle on the in-memory store.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<store::MemoryUploadStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config(Box::new(UploadServiceConfig {
        base: BaseConfig {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 30,
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        database_url: "postgres://localhost/ridevault_test".to_string(),
        s3_bucket: "ridevault-videos".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        max_file_size_bytes: 5 * 1024 * 1024 * 1024,
        allowed_extensions: vec![
            "mp4".to_string(),
            "mov".to_string(),
            "avi".to_string(),
            "mkv".to_string(),
        ],
        allowed_content_types: vec![
            "video/mp4".to_string(),
            "video/quicktime".to_string(),
            "video/x-msvideo".to_string(),
            "video/x-matroska".to_string(),
        ],
        presigned_url_expiry_secs: 3600,
        record_retention_days: 90,
        downstream_timeout_secs: 5,
        downstream_retry_attempts: 2,
    }))
}

/// Setup a test app with in-memory collaborators.
pub fn setup_test_app() -> TestApp {
    let config = test_config();
    let memory_store = Arc::new(store::MemoryUploadStore::new());

    let validator = UploadValidator::new(
        config.max_file_size_bytes(),
        config.allowed_extensions().to_vec(),
        config.allowed_content_types().to_vec(),
    );

    let state = Arc::new(AppState {
        validator,
        store: memory_store.clone(),
        issuer: Arc::new(issuer::StaticIssuer::new(
            config.s3_bucket().to_string(),
            config.s3_region().to_string(),
        )),
        verifier: Arc::new(JwtVerifier::new(config.jwt_secret())),
        config,
    });

    let router = routes::build_router(state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        store: memory_store,
    }
}
