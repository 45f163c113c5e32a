//! Lifetime of the relay object used by two-hop transfers

use std::sync::Arc;
use tracing::{debug, warn};

use super::{CleanupScope, TransferOptions};
use crate::protocol::s3::{ObjectStore, S3Result};

/// Deletes scratch objects when a two-hop transfer ends.
///
/// The normal path calls [`ScratchGuard::release`] after the hops. If the
/// transfer future is dropped first, the deletion is spawned on the current
/// Tokio runtime instead.
pub(crate) struct ScratchGuard {
    store: Arc<dyn ObjectStore>,
    target: String,
    armed: bool,
}

impl ScratchGuard {
    pub(crate) fn new(store: Arc<dyn ObjectStore>, options: &TransferOptions, key: &str) -> Self {
        let target = match options.cleanup_scope {
            CleanupScope::Prefix => options.scratch_dir(),
            CleanupScope::Key => key.to_string(),
        };

        Self {
            store,
            target,
            armed: true,
        }
    }

    /// Run the cleanup now
    pub(crate) async fn release(mut self) -> S3Result<usize> {
        self.armed = false;
        let deleted = self.store.delete_by_prefix(&self.target).await?;
        debug!(prefix = %self.target, deleted, "scratch space cleaned");
        Ok(deleted)
    }
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let store = Arc::clone(&self.store);
        let target = std::mem::take(&mut self.target);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = store.delete_by_prefix(&target).await {
                        warn!(prefix = %target, error = %e, "scratch cleanup after cancelled transfer failed");
                    }
                });
            }
            Err(_) => {
                warn!(prefix = %target, "no runtime available, scratch objects left behind");
            }
        }
    }
}
