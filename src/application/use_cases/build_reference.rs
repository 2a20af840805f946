use crate::application::services::{
    plan_install_targets, CompileError, CompileOutcome, ConfigMaterializer, DependencyInstaller,
    DocBuilder, InstallError, InstallTarget, MaterializeError, MaterializedConfig,
    RepositorySynchronizer, SyncError, SyncOutcome,
};
use crate::common::error::RefdocsError;
use crate::domain::entities::{distinct_remotes, Catalog};
use crate::domain::value_objects::RemoteKey;
use crate::infrastructure::docgen::{DocCompiler, RootOptions, TypedocCli};
use crate::infrastructure::filesystem::PackageConfigStore;
use crate::infrastructure::github::{CommitLookup, CommitLookupError, GithubCommitLookup};
use crate::infrastructure::package_manager::{CommandPackageManager, PackageManager};
use crate::infrastructure::scm::{GitScm, ScmOperations};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Directory under the workspace holding one clone per remote.
pub const REPOS_DIR: &str = "repos";

/// Directory under the workspace for compiler intermediates.
pub const WORK_DIR: &str = ".refdocs";

/// BuildReference関連のエラー
#[derive(Debug, Error)]
pub enum BuildReferenceError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl BuildReferenceError {
    /// パイプラインのフェーズ名
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Sync(_) => "Sync",
            Self::Install(_) => "Install",
            Self::Materialize(_) => "Configure",
            Self::Compile(_) => "Compile",
        }
    }
}

impl From<BuildReferenceError> for RefdocsError {
    fn from(error: BuildReferenceError) -> Self {
        let phase = error.phase();
        let message = error.to_string();
        RefdocsError::pipeline_error_with_source(phase, message, error)
    }
}

/// リファレンスビルドの設定
#[derive(Debug, Clone)]
pub struct BuildReferenceConfig {
    /// ワークスペースのルート
    pub workspace_root: PathBuf,

    /// 出力先（Noneの場合はカタログの `site.out`）
    pub out_dir: Option<PathBuf>,

    /// 同期フェーズのみ実行するか
    pub sync_only: bool,
}

impl BuildReferenceConfig {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            out_dir: None,
            sync_only: false,
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    pub fn with_sync_only(mut self, sync_only: bool) -> Self {
        self.sync_only = sync_only;
        self
    }

    /// クローンのルートディレクトリ
    pub fn repos_root(&self) -> PathBuf {
        self.workspace_root.join(REPOS_DIR)
    }

    /// 出力ディレクトリ（ワークスペース基準で解決）
    pub fn resolve_out_dir(&self, catalog: &Catalog) -> PathBuf {
        let out = self.out_dir.as_ref().unwrap_or(&catalog.site.out);
        self.workspace_root.join(out)
    }
}

/// The external systems the pipeline talks to
#[derive(Clone)]
pub struct PipelineAdapters {
    pub commit_lookup: Arc<dyn CommitLookup>,
    pub scm: Arc<dyn ScmOperations>,
    pub package_manager: Arc<dyn PackageManager>,
    pub compiler: Arc<dyn DocCompiler>,
}

impl PipelineAdapters {
    /// GitHub API, the `git` CLI, `yarn install` and `npx typedoc`
    pub fn production(
        config: &BuildReferenceConfig,
        github_token: Option<String>,
    ) -> Result<Self, CommitLookupError> {
        Ok(Self {
            commit_lookup: Arc::new(GithubCommitLookup::new(github_token)?),
            scm: Arc::new(GitScm::new()),
            package_manager: Arc::new(CommandPackageManager::yarn()),
            compiler: Arc::new(TypedocCli::npx(config.workspace_root.join(WORK_DIR))),
        })
    }
}

/// ビルド結果
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// 同期したリモートとその結果
    pub synced: Vec<(RemoteKey, SyncOutcome)>,

    /// 実行したインストール
    pub installed: Vec<InstallTarget>,

    /// 書き込んだパッケージ設定
    pub configs: Vec<MaterializedConfig>,

    /// コンパイル結果（同期のみの場合はNone）
    pub compile: Option<CompileOutcome>,
}

impl BuildReport {
    /// 新規クローン（再クローン含む）の数
    pub fn cloned_count(&self) -> usize {
        self.synced
            .iter()
            .filter(|(_, outcome)| *outcome != SyncOutcome::UpToDate)
            .count()
    }
}

/// sync → install → configure → compile
pub struct BuildReferenceUseCase {
    config: BuildReferenceConfig,
    adapters: PipelineAdapters,
}

impl BuildReferenceUseCase {
    /// 新しいBuildReferenceUseCaseインスタンスを作成
    pub fn new(config: BuildReferenceConfig, adapters: PipelineAdapters) -> Self {
        Self { config, adapters }
    }

    /// Run the pipeline over `catalog`.
    ///
    /// Each phase finishes for every target before the next one starts, and
    /// the first failure aborts the run.
    pub async fn execute(&self, catalog: &Catalog) -> Result<BuildReport, BuildReferenceError> {
        let repos_root = self.config.repos_root();

        // Dedup happens up front, before anything runs concurrently
        let packages = catalog.packages();
        let remotes = distinct_remotes(&packages);
        let install_targets = plan_install_targets(&packages, &repos_root);

        let mut report = BuildReport::default();

        // 1. 同期
        let synchronizer = RepositorySynchronizer::new(
            self.adapters.commit_lookup.clone(),
            self.adapters.scm.clone(),
            &repos_root,
        );
        report.synced = synchronizer.sync_all(&remotes).await?;
        if self.config.sync_only {
            info!("Done");
            return Ok(report);
        }

        // 2. 依存関係のインストール
        let installer = DependencyInstaller::new(self.adapters.package_manager.clone());
        installer.install_all(&install_targets).await?;
        report.installed = install_targets;

        // 3. パッケージ設定の書き込み
        let materializer = ConfigMaterializer::new(PackageConfigStore::new(), &repos_root);
        report.configs = materializer.materialize_all(&packages).await?;

        // 4. コンパイル
        let package_dirs: Vec<PathBuf> = report
            .configs
            .iter()
            .map(|config| config.package_dir.clone())
            .collect();
        let options = RootOptions::from_site(&catalog.site, self.config.resolve_out_dir(catalog));
        let builder = DocBuilder::new(self.adapters.compiler.clone());
        report.compile = Some(builder.compile_all(&package_dirs, &options).await?);

        info!("Done");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::docgen::typedoc::MockDocCompiler;
    use crate::infrastructure::github::commit_lookup::MockCommitLookup;
    use crate::infrastructure::package_manager::{MockPackageManager, PackageManagerError};
    use crate::infrastructure::scm::scm_interface::MockScmOperations;
    use std::path::Path;

    const CATALOG: &str = r#"
site:
  name: Docs
  hostedBaseUrl: https://docs.example.com/
  out: public/js
sources:
  - package: core
    path: libs/core
    repo: org/repo
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml_str(CATALOG).unwrap()
    }

    fn adapters(
        scm: MockScmOperations,
        package_manager: MockPackageManager,
        compiler: MockDocCompiler,
    ) -> PipelineAdapters {
        PipelineAdapters {
            commit_lookup: Arc::new(MockCommitLookup::new()),
            scm: Arc::new(scm),
            package_manager: Arc::new(package_manager),
            compiler: Arc::new(compiler),
        }
    }

    fn cloning_scm() -> MockScmOperations {
        let mut scm = MockScmOperations::new();
        scm.expect_is_repository().return_const(false);
        scm.expect_remove_clone().returning(|_| Ok(()));
        scm.expect_shallow_clone().returning(|_, _, _| Ok(()));
        scm
    }

    #[test]
    fn test_config_resolves_layout() {
        let config = BuildReferenceConfig::new("/ws");
        assert_eq!(config.repos_root(), Path::new("/ws/repos"));
        assert_eq!(config.resolve_out_dir(&catalog()), Path::new("/ws/public/js"));

        let config = config.with_out_dir("/elsewhere");
        assert_eq!(config.resolve_out_dir(&catalog()), Path::new("/elsewhere"));
    }

    #[tokio::test]
    async fn test_sync_only_stops_after_sync() {
        let mut package_manager = MockPackageManager::new();
        package_manager.expect_install().never();
        let mut compiler = MockDocCompiler::new();
        compiler.expect_convert().never();

        let use_case = BuildReferenceUseCase::new(
            BuildReferenceConfig::new("/ws").with_sync_only(true),
            adapters(cloning_scm(), package_manager, compiler),
        );

        let report = use_case.execute(&catalog()).await.unwrap();
        assert_eq!(report.synced.len(), 1);
        assert_eq!(report.cloned_count(), 1);
        assert!(report.compile.is_none());
    }

    #[tokio::test]
    async fn test_install_failure_aborts_before_configure() {
        let mut package_manager = MockPackageManager::new();
        package_manager.expect_install().returning(|dir| {
            Err(PackageManagerError::InstallFailed {
                command: "yarn install".to_string(),
                dir: dir.display().to_string(),
                exit_code: 1,
                output: String::new(),
            })
        });
        let mut compiler = MockDocCompiler::new();
        compiler.expect_convert().never();

        let use_case = BuildReferenceUseCase::new(
            BuildReferenceConfig::new("/ws"),
            adapters(cloning_scm(), package_manager, compiler),
        );

        let error = use_case.execute(&catalog()).await.unwrap_err();
        assert_eq!(error.phase(), "Install");

        let error: RefdocsError = error.into();
        assert!(error.to_string().starts_with("Install failed: "));
    }
}
