/*!
 * Storage domains for TuringDB transfers
 *
 * A transfer path lives in one of three places:
 * - the local filesystem
 * - an S3 bucket (`s3://key`)
 * - TuringDB's own storage (`turingdb://path`)
 */

pub mod s3;
pub mod uri;

use std::fmt;

pub use uri::{classify, resolve_local_path};

/// URI prefix for object-store keys
pub const S3_SCHEME: &str = "s3://";

/// URI prefix for paths inside the remote service's storage
pub const TURINGDB_SCHEME: &str = "turingdb://";

/// Where a path lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageDomain {
    Local,
    ObjectStore,
    Remote,
}

impl StorageDomain {
    /// Scheme prefix that selects this domain (empty for local paths)
    pub fn scheme(&self) -> &'static str {
        match self {
            StorageDomain::Local => "",
            StorageDomain::ObjectStore => S3_SCHEME,
            StorageDomain::Remote => TURINGDB_SCHEME,
        }
    }
}

impl fmt::Display for StorageDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageDomain::Local => write!(f, "local"),
            StorageDomain::ObjectStore => write!(f, "s3"),
            StorageDomain::Remote => write!(f, "turingdb"),
        }
    }
}

/// A classified path: its domain plus the location with the scheme removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPath {
    domain: StorageDomain,
    location: String,
}

impl TransferPath {
    /// Classify `path` and strip its scheme
    pub fn parse(path: &str) -> Self {
        let domain = classify(path);
        let location = path
            .strip_prefix(domain.scheme())
            .unwrap_or(path)
            .to_string();
        Self { domain, location }
    }

    pub fn domain(&self) -> StorageDomain {
        self.domain
    }

    /// Filesystem path, bucket-relative key, or remote-internal path
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for TransferPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.domain.scheme(), self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_scheme() {
        let path = TransferPath::parse("s3://graphs/g.gml");
        assert_eq!(path.domain(), StorageDomain::ObjectStore);
        assert_eq!(path.location(), "graphs/g.gml");

        let path = TransferPath::parse("turingdb://g.gml");
        assert_eq!(path.domain(), StorageDomain::Remote);
        assert_eq!(path.location(), "g.gml");
    }

    #[test]
    fn test_local_location_untouched() {
        let path = TransferPath::parse("~/data/g.gml");
        assert_eq!(path.domain(), StorageDomain::Local);
        assert_eq!(path.location(), "~/data/g.gml");
    }

    #[test]
    fn test_display_restores_scheme() {
        for raw in ["s3://a/b", "turingdb://x", "/tmp/y"] {
            assert_eq!(TransferPath::parse(raw).to_string(), raw);
        }
    }
}
