//! `ObjectStore` implementation for the AWS-backed client

use super::client::S3Client;
use super::error::{S3Error, S3Result};
use super::{ObjectStore, StoreCredentials};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[async_trait]
impl ObjectStore for S3Client {
    fn bucket(&self) -> &str {
        &self.config().bucket
    }

    fn credentials(&self) -> &StoreCredentials {
        self.resolved_credentials()
    }

    async fn put(&self, local_path: &Path, key: &str) -> S3Result<()> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| S3Error::Io(format!("{}: {}", local_path.display(), e)))?;

        self.aws_client()
            .put_object()
            .bucket(self.bucket())
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(S3Error::from)?;

        debug!(bucket = %self.bucket(), key, "uploaded {}", local_path.display());
        Ok(())
    }

    async fn get(&self, key: &str, local_path: &Path) -> S3Result<()> {
        let response = self
            .aws_client()
            .get_object()
            .bucket(self.bucket())
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    S3Error::NotFound {
                        bucket: self.bucket().to_string(),
                        key: key.to_string(),
                    }
                } else {
                    S3Error::from(e)
                }
            })?;

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(local_path).await?;
        let mut body = response.body;

        while let Some(bytes) = body
            .try_next()
            .await
            .map_err(|e| S3Error::Network(format!("Failed to read response body: {}", e)))?
        {
            file.write_all(&bytes).await?;
        }

        file.flush().await?;
        debug!(bucket = %self.bucket(), key, "downloaded to {}", local_path.display());
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> S3Result<usize> {
        let mut continuation_token: Option<String> = None;
        let mut deleted = 0usize;

        loop {
            let mut request = self
                .aws_client()
                .list_objects_v2()
                .bucket(self.bucket())
                .prefix(prefix);

            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(S3Error::from)?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    self.delete(key).await?;
                    deleted += 1;
                }
            }

            if response.is_truncated().unwrap_or(false) {
                continuation_token = response.next_continuation_token().map(|s| s.to_string());
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        debug!(bucket = %self.bucket(), prefix, deleted, "deleted objects by prefix");
        Ok(deleted)
    }
}
