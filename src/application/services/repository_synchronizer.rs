use crate::domain::entities::Remote;
use crate::domain::value_objects::RemoteKey;
use crate::infrastructure::github::{CommitLookup, CommitLookupError};
use crate::infrastructure::scm::{ScmError, ScmOperations};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Repository synchronization errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not fetch the latest commit of {key}: {source}")]
    CommitLookup {
        key: RemoteKey,
        #[source]
        source: CommitLookupError,
    },

    #[error("Could not clone {key}: {source}")]
    Clone {
        key: RemoteKey,
        #[source]
        source: ScmError,
    },

    #[error("Could not remove the stale clone of {key}: {source}")]
    Remove {
        key: RemoteKey,
        #[source]
        source: ScmError,
    },
}

/// What `ensure_synced` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No clone existed yet
    Cloned,
    /// The clone was behind the remote branch and was replaced
    Recloned,
    /// Local and remote commits matched
    UpToDate,
}

/// Keeps one shallow clone per (repository, branch) under `repos_root`
pub struct RepositorySynchronizer {
    commit_lookup: Arc<dyn CommitLookup>,
    scm: Arc<dyn ScmOperations>,
    repos_root: PathBuf,
}

impl RepositorySynchronizer {
    /// 新しいRepositorySynchronizerインスタンスを作成
    pub fn new(
        commit_lookup: Arc<dyn CommitLookup>,
        scm: Arc<dyn ScmOperations>,
        repos_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            commit_lookup,
            scm,
            repos_root: repos_root.into(),
        }
    }

    /// クローンを配置するルートディレクトリ
    pub fn repos_root(&self) -> &Path {
        &self.repos_root
    }

    /// Bring the clone of `remote` up to date with its branch.
    ///
    /// An existing clone is kept when its branch commit equals the host's;
    /// otherwise it is removed and shallow-cloned again.
    pub async fn ensure_synced(&self, remote: &Remote) -> Result<SyncOutcome, SyncError> {
        let key = remote.key();
        let path = remote.local_path(&self.repos_root);
        info!("Pulling {}", key);

        if !self.scm.is_repository(&path) {
            self.fresh_clone(remote, &key, &path).await?;
            return Ok(SyncOutcome::Cloned);
        }

        let remote_sha = self
            .commit_lookup
            .latest_commit(&remote.repo, remote.branch())
            .await
            .map_err(|source| SyncError::CommitLookup {
                key: key.clone(),
                source,
            })?;

        match self.scm.head_commit(&path, remote.branch()).await {
            Ok(local_sha) if local_sha == remote_sha => {
                debug!("{} is up to date at {}", key, local_sha);
                return Ok(SyncOutcome::UpToDate);
            }
            Ok(local_sha) => {
                debug!("{} moved from {} to {}", key, local_sha, remote_sha);
            }
            Err(e) => {
                warn!("Could not read the local commit of {}, recloning: {}", key, e);
            }
        }

        self.fresh_clone(remote, &key, &path).await?;
        Ok(SyncOutcome::Recloned)
    }

    /// Synchronize every remote concurrently; the first failure aborts the phase.
    pub async fn sync_all(
        &self,
        remotes: &[Remote],
    ) -> Result<Vec<(RemoteKey, SyncOutcome)>, SyncError> {
        try_join_all(remotes.iter().map(|remote| async move {
            let outcome = self.ensure_synced(remote).await?;
            Ok((remote.key(), outcome))
        }))
        .await
    }

    async fn fresh_clone(&self, remote: &Remote, key: &RemoteKey, path: &Path) -> Result<(), SyncError> {
        self.scm
            .remove_clone(path)
            .await
            .map_err(|source| SyncError::Remove {
                key: key.clone(),
                source,
            })?;

        self.scm
            .shallow_clone(&remote.repo.clone_url(), remote.branch(), path)
            .await
            .map_err(|source| SyncError::Clone {
                key: key.clone(),
                source,
            })
    }
}
