//! Configuration module
//!
//! Environment-driven configuration for the upload service: server, database,
//! object storage, credential policy, and auth settings.

use std::env;

use crate::constants;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DOWNSTREAM_TIMEOUT_SECS: u64 = 10;
const DOWNSTREAM_RETRY_ATTEMPTS: u32 = 3;

/// Base configuration shared by server and background tooling
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// Upload service configuration
#[derive(Clone, Debug)]
pub struct UploadServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Object storage
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers
    // Upload policy
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub presigned_url_expiry_secs: u64,
    pub record_retention_days: i64,
    // Downstream call policy
    pub downstream_timeout_secs: u64,
    pub downstream_retry_attempts: u32,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<UploadServiceConfig>);

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(v) => v
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

impl UploadServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let base = BaseConfig {
            server_port: env_parse("SERVER_PORT", 3000),
            cors_origins: env_list("CORS_ORIGINS", &["*"]),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?,
            environment: env_string("ENVIRONMENT", "development"),
        };

        Ok(UploadServiceConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?,
            s3_bucket: env::var("S3_BUCKET")
                .map_err(|_| anyhow::anyhow!("S3_BUCKET environment variable not set"))?,
            s3_region: env_string("S3_REGION", "us-east-1"),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            max_file_size_bytes: env_parse(
                "MAX_FILE_SIZE_BYTES",
                constants::DEFAULT_MAX_FILE_SIZE_BYTES,
            ),
            allowed_extensions: env_list(
                "ALLOWED_EXTENSIONS",
                constants::DEFAULT_ALLOWED_EXTENSIONS,
            ),
            allowed_content_types: env_list(
                "ALLOWED_CONTENT_TYPES",
                constants::DEFAULT_ALLOWED_CONTENT_TYPES,
            ),
            presigned_url_expiry_secs: env_parse(
                "PRESIGNED_URL_EXPIRY_SECS",
                constants::DEFAULT_PRESIGNED_URL_EXPIRY_SECS,
            ),
            record_retention_days: env_parse(
                "RECORD_RETENTION_DAYS",
                constants::DEFAULT_RECORD_RETENTION_DAYS,
            ),
            downstream_timeout_secs: env_parse("DOWNSTREAM_TIMEOUT_SECS", DOWNSTREAM_TIMEOUT_SECS),
            downstream_retry_attempts: env_parse(
                "DOWNSTREAM_RETRY_ATTEMPTS",
                DOWNSTREAM_RETRY_ATTEMPTS,
            ),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }
        if self.max_file_size_bytes <= constants::MIN_FILE_SIZE_BYTES {
            anyhow::bail!(
                "MAX_FILE_SIZE_BYTES must be greater than {} bytes",
                constants::MIN_FILE_SIZE_BYTES
            );
        }
        if self.allowed_extensions.is_empty() || self.allowed_content_types.is_empty() {
            anyhow::bail!("allowed extensions and content types must not be empty");
        }
        if self.presigned_url_expiry_secs == 0 {
            anyhow::bail!("PRESIGNED_URL_EXPIRY_SECS must be greater than zero");
        }
        if self.record_retention_days <= 0 {
            anyhow::bail!("RECORD_RETENTION_DAYS must be greater than zero");
        }
        Ok(())
    }
}

impl Config {
    fn inner(&self) -> &UploadServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = UploadServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn s3_bucket(&self) -> &str {
        &self.inner().s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.inner().s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.inner().allowed_content_types
    }

    pub fn presigned_url_expiry_secs(&self) -> u64 {
        self.inner().presigned_url_expiry_secs
    }

    pub fn record_retention_days(&self) -> i64 {
        self.inner().record_retention_days
    }

    pub fn downstream_timeout_secs(&self) -> u64 {
        self.inner().downstream_timeout_secs
    }

    pub fn downstream_retry_attempts(&self) -> u32 {
        self.inner().downstream_retry_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> UploadServiceConfig {
        UploadServiceConfig {
            base: BaseConfig {
                server_port: 3000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 30,
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
                environment: "test".to_string(),
            },
            database_url: "postgres://localhost/ridevault".to_string(),
            s3_bucket: "ridevault-videos".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            max_file_size_bytes: constants::DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_extensions: vec!["mp4".to_string()],
            allowed_content_types: vec!["video/mp4".to_string()],
            presigned_url_expiry_secs: 3600,
            record_retention_days: 90,
            downstream_timeout_secs: 10,
            downstream_retry_attempts: 3,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = test_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_expiry() {
        let mut config = test_config();
        config.presigned_url_expiry_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = test_config();
        config.base.environment = "production".to_string();
        assert!(Config(Box::new(config)).is_production());
        assert!(!Config(Box::new(test_config())).is_production());
    }
}
