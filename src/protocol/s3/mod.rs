//! Object-store adapter used as the relay between local files and TuringDB
//!
//! The transfer router only needs three blob operations keyed by bucket and
//! key, plus the credential material the remote service needs for its own
//! `S3 CONNECT` directive. Those are captured by the [`ObjectStore`] trait;
//! `S3Client` implements it on top of the official AWS SDK when the
//! `s3-native` feature is enabled.
//!
//! # Example
//!
//! ```ignore
//! use turingdb::protocol::s3::{ObjectStore, S3Client, S3Config};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = S3Config::new("my-bucket").with_region("eu-west-2");
//!     let client = S3Client::new(config).await?;
//!     client.put(Path::new("/tmp/graph.gml"), "graphs/graph.gml").await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;

#[cfg(feature = "s3-native")]
mod client;

#[cfg(feature = "s3-native")]
mod operations;

#[cfg(all(test, feature = "s3-native"))]
mod live_tests;

pub use config::S3Config;
pub use error::{S3Error, S3Result};

#[cfg(feature = "s3-native")]
pub use client::S3Client;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Credentials resolved when the adapter was built.
///
/// The remote service performs its own S3 reads and writes for
/// Remote<->ObjectStore hops, so these are forwarded verbatim in `S3 CONNECT`.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreCredentials {
    pub access_key: String,
    pub secret_key: String,
    /// Resolved region, empty when none could be determined
    pub region: String,
}

impl StoreCredentials {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
        }
    }
}

impl fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Blob operations over a single bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket every key is relative to
    fn bucket(&self) -> &str;

    /// Credential material resolved at construction
    fn credentials(&self) -> &StoreCredentials;

    /// Upload a local file to `key`
    async fn put(&self, local_path: &Path, key: &str) -> S3Result<()>;

    /// Download `key` into a local file, creating parent directories
    async fn get(&self, key: &str, local_path: &Path) -> S3Result<()>;

    /// Delete every object whose key starts with `prefix`, returning the count
    async fn delete_by_prefix(&self, prefix: &str) -> S3Result<usize>;
}
