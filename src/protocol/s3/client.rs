//! S3 client implementation

use super::config::S3Config;
use super::error::{S3Error, S3Result};
use super::StoreCredentials;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, ProvideCredentials, Region};
use aws_sdk_s3::Client as AwsS3Client;
use std::time::Duration;
use tracing::debug;

/// S3 client for interacting with AWS S3 and S3-compatible storage
#[derive(Clone)]
pub struct S3Client {
    /// AWS S3 client
    client: AwsS3Client,

    /// Client configuration
    config: S3Config,

    /// Credentials as resolved by the provider chain
    credentials: StoreCredentials,
}

impl S3Client {
    /// Create a new S3 client with the given configuration.
    ///
    /// Explicit credentials in `config` override the installed credential
    /// chain. Whatever the chain resolves to is kept so it can be forwarded
    /// to the remote service.
    pub async fn new(config: S3Config) -> S3Result<Self> {
        config.validate()?;

        let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest());

        let region_provider = if let Some(region_str) = &config.region {
            RegionProviderChain::first_try(Region::new(region_str.clone()))
        } else {
            RegionProviderChain::default_provider()
        };
        aws_config_loader = aws_config_loader.region(region_provider);

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                config.session_token.clone(),
                None,
                "turingdb-s3-explicit",
            );
            aws_config_loader = aws_config_loader.credentials_provider(credentials);
        }

        let aws_config = aws_config_loader.load().await;

        let provider = aws_config.credentials_provider().ok_or_else(|| {
            S3Error::Authentication("No AWS credentials provider configured".to_string())
        })?;
        let resolved = provider
            .provide_credentials()
            .await
            .map_err(|e| S3Error::Authentication(e.to_string()))?;
        let region = aws_config
            .region()
            .map(|r| r.as_ref().to_string())
            .unwrap_or_default();

        let credentials = StoreCredentials::new(
            resolved.access_key_id(),
            resolved.secret_access_key(),
            region,
        );

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&aws_config);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let timeout_config = aws_sdk_s3::config::timeout::TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        s3_config_builder = s3_config_builder.timeout_config(timeout_config);

        let client = AwsS3Client::from_conf(s3_config_builder.build());

        debug!(
            bucket = %config.bucket,
            region = %credentials.region,
            "S3 client ready"
        );

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Get a reference to the underlying AWS S3 client
    pub fn aws_client(&self) -> &AwsS3Client {
        &self.client
    }

    pub(crate) fn resolved_credentials(&self) -> &StoreCredentials {
        &self.credentials
    }

    /// Test the connection by attempting to head the bucket
    pub async fn test_connection(&self) -> S3Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                if status == Some(404) {
                    S3Error::BucketNotFound(self.config.bucket.clone())
                } else if status == Some(403) {
                    S3Error::AccessDenied(format!("Cannot access bucket: {}", self.config.bucket))
                } else {
                    S3Error::from(e)
                }
            })?;
        Ok(())
    }

    /// Delete a single object from the bucket
    pub async fn delete(&self, key: &str) -> S3Result<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(S3Error::from)?;
        Ok(())
    }
}
