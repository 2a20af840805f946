use crate::domain::entities::Package;
use crate::infrastructure::filesystem::{ConfigStoreError, PackageConfigStore};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration materialization errors
#[derive(Debug, Error)]
#[error("Could not write the documentation config of {package}: {source}")]
pub struct MaterializeError {
    pub package: String,
    #[source]
    pub source: ConfigStoreError,
}

/// マテリアライズ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedConfig {
    /// パッケージ名
    pub package: String,

    /// パッケージディレクトリ（コンパイラのエントリポイント）
    pub package_dir: PathBuf,

    /// 書き込んだ設定ファイル
    pub config_path: PathBuf,

    /// マニフェストから抽出したエントリポイント
    pub entry_points: Vec<String>,
}

/// Writes each package's `typedoc.json` from its manifest
pub struct ConfigMaterializer {
    store: PackageConfigStore,
    repos_root: PathBuf,
}

impl ConfigMaterializer {
    /// 新しいConfigMaterializerインスタンスを作成
    pub fn new(store: PackageConfigStore, repos_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            repos_root: repos_root.into(),
        }
    }

    /// クローンのルートディレクトリ
    pub fn repos_root(&self) -> &Path {
        &self.repos_root
    }

    /// Derive entry points from `package.json` and merge them into `typedoc.json`
    pub async fn materialize_config(
        &self,
        package: &Package,
    ) -> Result<MaterializedConfig, MaterializeError> {
        let package_dir = package.local_path(&self.repos_root);
        let wrap = |source| MaterializeError {
            package: package.package.clone(),
            source,
        };

        let manifest = self.store.read_manifest(&package_dir).await.map_err(wrap)?;
        let entry_points = manifest.entry_points();

        let config = self
            .store
            .read_doc_config(&package_dir)
            .await
            .map_err(wrap)?
            .merge_defaults(&entry_points);

        let config_path = self
            .store
            .write_doc_config(&package_dir, &config)
            .await
            .map_err(wrap)?;

        debug!(
            "Wrote {} with {} entry points",
            config_path.display(),
            entry_points.len()
        );

        Ok(MaterializedConfig {
            package: package.package.clone(),
            package_dir,
            config_path,
            entry_points,
        })
    }

    /// Materialize every package concurrently, results in input order.
    pub async fn materialize_all(
        &self,
        packages: &[&Package],
    ) -> Result<Vec<MaterializedConfig>, MaterializeError> {
        try_join_all(packages.iter().map(|package| self.materialize_config(package))).await
    }
}
