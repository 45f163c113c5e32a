//! Remote-side transfer directives
//!
//! The service moves data between its own storage and S3 itself, once it has
//! been given credentials with `S3 CONNECT`. The router only needs a way to
//! submit those directives.

use async_trait::async_trait;

use crate::client::Command;
use crate::error::Result;
use crate::protocol::S3_SCHEME;

/// Anything that can execute a command on the TuringDB service
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn submit(&self, command: &Command) -> Result<()>;
}

/// Bucket-qualified object URL as the service expects it
pub fn bucket_url(bucket: &str, key: &str) -> String {
    format!("{}{}/{}", S3_SCHEME, bucket, key)
}

/// Service copies `remote_path` into the bucket at `key`
pub fn push(remote_path: &str, bucket: &str, key: &str) -> Command {
    Command::S3Push {
        src: remote_path.to_string(),
        dst: bucket_url(bucket, key),
    }
}

/// Service copies `key` from the bucket to `remote_path`
pub fn pull(bucket: &str, key: &str, remote_path: &str) -> Command {
    Command::S3Pull {
        src: bucket_url(bucket, key),
        dst: remote_path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_qualify_bucket() {
        assert_eq!(
            push("g.gml", "graphs", "out/g.gml").to_string(),
            r#"S3 PUSH "g.gml" "s3://graphs/out/g.gml""#
        );
        assert_eq!(
            pull("graphs", "__scratch__/abc", "g.gml").to_string(),
            r#"S3 PULL "s3://graphs/__scratch__/abc" "g.gml""#
        );
    }
}
