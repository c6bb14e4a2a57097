//! S3 credential issuer.
//!
//! Issues per-part presigned PUT URLs through a real multipart upload and
//! signed browser POST policies. Bytes never pass through this service; the
//! client transfers directly against object storage with the credentials
//! issued here.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::ServerSideEncryption;
use aws_sdk_s3::Client;
use chrono::Utc;
use std::time::Duration;

use crate::post_policy::{PostPolicyOptions, PostPolicySigner};
use crate::traits::{CredentialIssuer, PresignedPost, StorageError, StorageResult};

/// S3-backed credential issuer
#[derive(Clone)]
pub struct S3Issuer {
    client: Client,
    post_signer: PostPolicySigner,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Issuer {
    /// Create a new S3Issuer.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible
    ///   providers (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let region_provider =
            RegionProviderChain::first_try(aws_config::Region::new(region.clone()));

        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_retry_mode(RetryMode::Adaptive);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config.clone())
            .load()
            .await;

        // POST policies are signed locally, so resolve static credentials up
        // front instead of deferring to the SDK's request signer.
        let credentials = config
            .credentials_provider()
            .ok_or_else(|| {
                StorageError::ConfigError("no AWS credentials provider configured".to_string())
            })?
            .provide_credentials()
            .await
            .map_err(|e| StorageError::ConfigError(format!("credentials unavailable: {}", e)))?;

        let post_signer = PostPolicySigner::new(
            credentials.access_key_id().to_string(),
            credentials.secret_access_key().to_string(),
            credentials.session_token().map(|t| t.to_string()),
            region.clone(),
        );

        // S3-compatible providers need path-style addressing.
        let client = if let Some(ref endpoint) = endpoint_url {
            let mut s3_config_builder = aws_sdk_s3::Config::builder()
                .endpoint_url(endpoint)
                .region(config.region().cloned())
                .retry_config(retry_config)
                .force_path_style(true);
            if let Some(provider) = config.credentials_provider() {
                s3_config_builder = s3_config_builder.credentials_provider(provider);
            }
            Client::from_conf(s3_config_builder.build())
        } else {
            Client::new(&config)
        };

        Ok(S3Issuer {
            client,
            post_signer,
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Form action URL for POST policy uploads.
    fn post_url(&self) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}", base_url, self.bucket)
        } else {
            format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region)
        }
    }
}

#[async_trait]
impl CredentialIssuer for S3Issuer {
    async fn presign_part_urls(
        &self,
        object_key: &str,
        content_type: &str,
        part_count: u32,
        expires_in: Duration,
    ) -> StorageResult<Vec<String>> {
        let start = std::time::Instant::now();

        let multipart = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(object_key)
            .content_type(content_type)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %object_key,
                    "S3 create_multipart_upload failed"
                );
                StorageError::BackendError(e.to_string())
            })?;

        let upload_id = multipart.upload_id().ok_or_else(|| {
            StorageError::BackendError("S3 returned no multipart upload id".to_string())
        })?;

        let presigning_config = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;

        let mut urls = Vec::with_capacity(part_count as usize);
        for part_number in 1..=part_count {
            let presigned = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(object_key)
                .upload_id(upload_id)
                .part_number(part_number as i32)
                .presigned(presigning_config.clone())
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %object_key,
                        part_number = part_number,
                        "S3 upload_part presigning failed"
                    );
                    StorageError::SigningFailed(e.to_string())
                })?;
            urls.push(presigned.uri().to_string());
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %object_key,
            part_count = part_count,
            expires_in_secs = expires_in.as_secs(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Presigned multipart part URLs"
        );

        Ok(urls)
    }

    async fn presign_post(
        &self,
        object_key: &str,
        options: PostPolicyOptions,
        expires_in: Duration,
    ) -> StorageResult<PresignedPost> {
        let issued_at = Utc::now();
        let expires_at = issued_at
            + chrono::Duration::from_std(expires_in)
                .map_err(|e| StorageError::SigningFailed(e.to_string()))?;

        let fields =
            self.post_signer
                .sign(&self.bucket, object_key, &options, issued_at, expires_at)?;

        tracing::info!(
            bucket = %self.bucket,
            key = %object_key,
            expires_in_secs = expires_in.as_secs(),
            "Signed POST policy"
        );

        Ok(PresignedPost {
            url: self.post_url(),
            fields,
        })
    }

    /// Public URL for an object.
    ///
    /// For AWS S3, uses the standard format:
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// For S3-compatible providers, path-style against the custom endpoint.
    fn object_url(&self, object_key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, object_key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, object_key
            )
        }
    }
}
