/*!
 * Data transfer between the local filesystem, S3 and TuringDB
 *
 * The local machine and the TuringDB service never talk directly: S3 is
 * the common relay. Transfers touching both ends go through a scratch
 * object that is removed afterwards.
 */

pub mod gateway;
pub mod router;
mod scratch;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TuringError};

pub use gateway::RemoteGateway;
pub use router::{select_strategy, TransferRouter, TransferStrategy};

/// Key prefix reserved for relay objects
pub const DEFAULT_SCRATCH_PREFIX: &str = "__scratch__";

/// What is deleted once a two-hop transfer finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupScope {
    /// Everything under the scratch prefix
    #[default]
    Prefix,

    /// Only the relay object of this transfer. Safe when several transfers
    /// share one bucket concurrently.
    Key,
}

/// Scratch-space settings for the transfer router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Allow Local <-> TuringDB transfers through a scratch object
    #[serde(default = "default_true")]
    pub use_scratch: bool,

    /// Key prefix for scratch objects (without trailing slash)
    #[serde(default = "default_scratch_prefix")]
    pub scratch_prefix: String,

    #[serde(default)]
    pub cleanup_scope: CleanupScope,
}

fn default_true() -> bool {
    true
}

fn default_scratch_prefix() -> String {
    DEFAULT_SCRATCH_PREFIX.to_string()
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            use_scratch: true,
            scratch_prefix: default_scratch_prefix(),
            cleanup_scope: CleanupScope::Prefix,
        }
    }
}

impl TransferOptions {
    /// Options with scratch transfers turned off
    pub fn without_scratch() -> Self {
        Self {
            use_scratch: false,
            ..Default::default()
        }
    }

    /// Reject options whose cleanup would reach outside the scratch space
    pub fn validate(&self) -> Result<()> {
        if self.scratch_prefix.trim_matches('/').is_empty() {
            return Err(TuringError::Config(
                "scratch_prefix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Prefix as used for listing, always ending in `/`
    pub fn scratch_dir(&self) -> String {
        format!("{}/", self.scratch_prefix.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransferOptions::default();
        assert!(options.use_scratch);
        assert_eq!(options.scratch_dir(), "__scratch__/");
        assert_eq!(options.cleanup_scope, CleanupScope::Prefix);
    }

    #[test]
    fn test_scratch_dir_single_slash() {
        let options = TransferOptions {
            scratch_prefix: "tmp/relay/".to_string(),
            ..Default::default()
        };
        assert_eq!(options.scratch_dir(), "tmp/relay/");
    }

    #[test]
    fn test_empty_prefix_rejected() {
        for prefix in ["", "/", "//"] {
            let options = TransferOptions {
                scratch_prefix: prefix.to_string(),
                ..Default::default()
            };
            assert!(matches!(options.validate(), Err(TuringError::Config(_))));
        }
        assert!(TransferOptions::default().validate().is_ok());
    }
}
