//! Object-store failures

use std::io;
use thiserror::Error;

pub type S3Result<T> = Result<T, S3Error>;

#[derive(Error, Debug, Clone)]
pub enum S3Error {
    /// Request could not be built or sent for a reason other than the network
    #[error("S3 request failed: {0}")]
    Sdk(String),

    /// Error code returned by the service
    #[error("S3 service error ({code}): {message}")]
    Service { code: String, message: String },

    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Bucket not found or not accessible: {0}")]
    BucketNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid S3 configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid bucket name: {0}")]
    InvalidBucketName(String),

    /// No usable credentials for the S3 CONNECT directive
    #[error("S3 credentials unavailable: {0}")]
    Authentication(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("S3 request timed out: {0}")]
    Timeout(String),
}

impl S3Error {
    /// Whether the same request may succeed if sent again
    pub fn is_retryable(&self) -> bool {
        match self {
            S3Error::Network(_) | S3Error::Timeout(_) | S3Error::Io(_) => true,
            S3Error::Service { code, .. } => is_retryable_code(code),
            _ => false,
        }
    }
}

impl From<io::Error> for S3Error {
    fn from(err: io::Error) -> Self {
        S3Error::Io(err.to_string())
    }
}

/// Service codes worth a retry: throttling and transient server faults
fn is_retryable_code(code: &str) -> bool {
    matches!(
        code,
        "RequestTimeout" | "ServiceUnavailable" | "InternalError" | "SlowDown"
    )
}

#[cfg(feature = "s3-native")]
impl<E> From<aws_sdk_s3::error::SdkError<E>> for S3Error
where
    E: aws_sdk_s3::error::ProvideErrorMetadata + std::error::Error + 'static,
{
    fn from(error: aws_sdk_s3::error::SdkError<E>) -> Self {
        use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};

        match error {
            SdkError::DispatchFailure(e) => S3Error::Network(format!("dispatch failure: {:?}", e)),
            SdkError::TimeoutError(e) => S3Error::Timeout(format!("{:?}", e)),
            SdkError::ResponseError(e) => S3Error::Network(format!("unreadable response: {:?}", e)),
            SdkError::ServiceError(e) => {
                let err = e.err();
                let code = err.code().unwrap_or("Unknown").to_string();
                let message = err.message().unwrap_or_default().to_string();
                if code == "AccessDenied" {
                    S3Error::AccessDenied(message)
                } else {
                    S3Error::Service { code, message }
                }
            }
            other => S3Error::Sdk(format!("{:?}", other)),
        }
    }
}
