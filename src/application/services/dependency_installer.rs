use crate::domain::entities::Package;
use crate::domain::value_objects::RemoteKey;
use crate::infrastructure::package_manager::{PackageManager, PackageManagerError};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Dependency installation errors
#[derive(Debug, Error)]
#[error("Installing dependencies for {target} failed: {source}")]
pub struct InstallError {
    pub target: InstallTarget,
    #[source]
    pub source: PackageManagerError,
}

/// Where one install runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallTarget {
    /// Repository root of a clone, once per (repository, branch)
    RepositoryRoot { key: RemoteKey, dir: PathBuf },
    /// Directory of a package flagged `packageInstall`
    Package { package: String, dir: PathBuf },
}

impl InstallTarget {
    /// Directory the package manager runs in
    pub fn dir(&self) -> &Path {
        match self {
            Self::RepositoryRoot { dir, .. } | Self::Package { dir, .. } => dir,
        }
    }
}

impl fmt::Display for InstallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepositoryRoot { key, .. } => write!(f, "{}", key),
            Self::Package { package, .. } => write!(f, "{}", package),
        }
    }
}

/// Install targets for `packages`, computed before the install phase starts.
///
/// A remote gets one root install when at least one of its packages is not
/// flagged `packageInstall`. Flagged packages each get an install in their
/// own directory; two flagged packages resolving to the same directory share
/// one install.
pub fn plan_install_targets(packages: &[&Package], repos_root: &Path) -> Vec<InstallTarget> {
    let mut seen_remotes: HashSet<RemoteKey> = HashSet::new();
    let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
    let mut targets = Vec::new();

    for package in packages {
        if package.package_install {
            let dir = package.local_path(repos_root);
            if seen_dirs.insert(dir.clone()) {
                targets.push(InstallTarget::Package {
                    package: package.package.clone(),
                    dir,
                });
            }
        } else {
            let key = package.remote.key();
            if seen_remotes.insert(key.clone()) {
                targets.push(InstallTarget::RepositoryRoot {
                    dir: package.remote.local_path(repos_root),
                    key,
                });
            }
        }
    }

    targets
}

/// Runs the package manager for each install target
pub struct DependencyInstaller {
    package_manager: Arc<dyn PackageManager>,
}

impl DependencyInstaller {
    /// 新しいDependencyInstallerインスタンスを作成
    pub fn new(package_manager: Arc<dyn PackageManager>) -> Self {
        Self { package_manager }
    }

    /// Install dependencies for one target; failure is fatal
    pub async fn ensure_installed(&self, target: &InstallTarget) -> Result<(), InstallError> {
        info!("Installing dependencies for {}", target);
        self.package_manager
            .install(target.dir())
            .await
            .map_err(|source| InstallError {
                target: target.clone(),
                source,
            })
    }

    /// Install every target concurrently; the first failure aborts the phase.
    pub async fn install_all(&self, targets: &[InstallTarget]) -> Result<(), InstallError> {
        try_join_all(targets.iter().map(|target| self.ensure_installed(target))).await?;
        Ok(())
    }
}
