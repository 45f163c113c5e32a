//! Transfer Router: picks and runs the strategy for a (source, destination) pair.
//!
//! | src → dst            | strategy                                   |
//! |----------------------|--------------------------------------------|
//! | same domain          | unsupported                                |
//! | local → s3           | upload                                     |
//! | s3 → local           | download                                   |
//! | turingdb → s3        | `S3 PUSH` on the service                   |
//! | s3 → turingdb        | `S3 PULL` on the service                   |
//! | local → turingdb     | upload to scratch, then `S3 PULL`          |
//! | turingdb → local     | `S3 PUSH` to scratch, then download        |

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gateway::{self, RemoteGateway};
use super::scratch::ScratchGuard;
use super::TransferOptions;
use crate::error::{Result, TuringError};
use crate::protocol::s3::ObjectStore;
use crate::protocol::{resolve_local_path, StorageDomain, TransferPath};

/// How a transfer is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    /// Pairing with no transfer path; carries the reason
    Unsupported(&'static str),

    /// Local file to object store
    Upload,

    /// Object store to local file
    Download,

    /// Service copies from its storage to the object store
    Push,

    /// Service copies from the object store into its storage
    Pull,

    /// Local → scratch object → service
    RelayToRemote,

    /// Service → scratch object → local
    RelayFromRemote,
}

impl TransferStrategy {
    /// Whether this strategy goes through a scratch object
    pub fn is_two_hop(&self) -> bool {
        matches!(
            self,
            TransferStrategy::RelayToRemote | TransferStrategy::RelayFromRemote
        )
    }
}

/// Strategy for a pair of domains
pub fn select_strategy(src: StorageDomain, dst: StorageDomain) -> TransferStrategy {
    use StorageDomain::*;

    match (src, dst) {
        (Local, Local) => TransferStrategy::Unsupported("local-to-local"),
        (ObjectStore, ObjectStore) => TransferStrategy::Unsupported("store-to-store"),
        (Remote, Remote) => TransferStrategy::Unsupported("remote-to-remote"),
        (Local, ObjectStore) => TransferStrategy::Upload,
        (ObjectStore, Local) => TransferStrategy::Download,
        (Remote, ObjectStore) => TransferStrategy::Push,
        (ObjectStore, Remote) => TransferStrategy::Pull,
        (Local, Remote) => TransferStrategy::RelayToRemote,
        (Remote, Local) => TransferStrategy::RelayFromRemote,
    }
}

/// Routes transfers over one object store
#[derive(Clone)]
pub struct TransferRouter {
    store: Arc<dyn ObjectStore>,
    options: TransferOptions,
}

impl TransferRouter {
    pub fn new(store: Arc<dyn ObjectStore>, options: TransferOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Transfer `src` to `dst`.
    ///
    /// Adapter and directive errors are returned as-is. Two-hop transfers
    /// always clean their scratch space, whatever the outcome of the hops.
    pub async fn transfer(&self, gateway: &dyn RemoteGateway, src: &str, dst: &str) -> Result<()> {
        let src = TransferPath::parse(src);
        let dst = TransferPath::parse(dst);
        let strategy = select_strategy(src.domain(), dst.domain());

        info!(src = %src, dst = %dst, ?strategy, two_hop = strategy.is_two_hop(), "transfer");

        match strategy {
            TransferStrategy::Unsupported(reason) => {
                Err(TuringError::Unimplemented(reason.to_string()))
            }
            TransferStrategy::Upload => self.upload(src.location(), dst.location()).await,
            TransferStrategy::Download => self.download(src.location(), dst.location()).await,
            TransferStrategy::Push => self.push(gateway, src.location(), dst.location()).await,
            TransferStrategy::Pull => self.pull(gateway, src.location(), dst.location()).await,
            TransferStrategy::RelayToRemote => {
                self.relay_to_remote(gateway, src.location(), dst.location())
                    .await
            }
            TransferStrategy::RelayFromRemote => {
                self.relay_from_remote(gateway, src.location(), dst.location())
                    .await
            }
        }
    }

    async fn upload(&self, local: &str, key: &str) -> Result<()> {
        let path = resolve_local_path(local)?;

        if is_local_dir(&path).await {
            return Err(TuringError::Unimplemented("directory upload".to_string()));
        }

        debug!(path = %path.display(), bucket = %self.store.bucket(), key, "upload");
        self.store.put(&path, key).await?;
        Ok(())
    }

    async fn download(&self, key: &str, local: &str) -> Result<()> {
        let path = resolve_local_path(local)?;

        debug!(bucket = %self.store.bucket(), key, path = %path.display(), "download");
        self.store.get(key, &path).await?;
        Ok(())
    }

    async fn push(&self, gateway: &dyn RemoteGateway, remote: &str, key: &str) -> Result<()> {
        if names_remote_dir(remote) {
            return Err(TuringError::Unimplemented("directory upload".to_string()));
        }

        gateway
            .submit(&gateway::push(remote, self.store.bucket(), key))
            .await
    }

    async fn pull(&self, gateway: &dyn RemoteGateway, key: &str, remote: &str) -> Result<()> {
        gateway
            .submit(&gateway::pull(self.store.bucket(), key, remote))
            .await
    }

    async fn relay_to_remote(
        &self,
        gateway: &dyn RemoteGateway,
        local: &str,
        remote: &str,
    ) -> Result<()> {
        let key = self.scratch_key()?;
        let guard = ScratchGuard::new(Arc::clone(&self.store), &self.options, &key);

        let outcome = async {
            self.upload(local, &key).await?;
            self.pull(gateway, &key, remote).await
        }
        .await;

        finish(guard, outcome).await
    }

    async fn relay_from_remote(
        &self,
        gateway: &dyn RemoteGateway,
        remote: &str,
        local: &str,
    ) -> Result<()> {
        let key = self.scratch_key()?;
        let guard = ScratchGuard::new(Arc::clone(&self.store), &self.options, &key);

        let outcome = async {
            self.push(gateway, remote, &key).await?;
            self.download(&key, local).await
        }
        .await;

        finish(guard, outcome).await
    }

    /// Fresh scratch key, or `ScratchDisabled`
    fn scratch_key(&self) -> Result<String> {
        if !self.options.use_scratch {
            return Err(TuringError::ScratchDisabled);
        }

        Ok(format!(
            "{}{}",
            self.options.scratch_dir(),
            uuid::Uuid::new_v4().simple()
        ))
    }
}

async fn finish(guard: ScratchGuard, outcome: Result<()>) -> Result<()> {
    if let Err(e) = guard.release().await {
        warn!(error = %e, "failed to clean scratch space");
    }
    outcome
}

async fn is_local_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// A remote path names a directory when it is empty or ends with `/`
fn names_remote_dir(path: &str) -> bool {
    path.is_empty() || path.ends_with('/')
}
