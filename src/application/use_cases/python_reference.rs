use super::clean_output::clear_directory;
use crate::common::error::RefdocsError;
use crate::domain::entities::PythonReferenceOptions;
use crate::domain::value_objects::RepoSlug;
use crate::infrastructure::archive::{extract_html_dir, ArchiveError, TarballDownloader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

/// Subdirectory of the Python output holding tagged releases.
pub const VERSIONS_DIR: &str = "versions";

/// PythonReference関連のエラー
#[derive(Debug, Error)]
pub enum PythonReferenceError {
    #[error("Only https URLs are allowed for tarball downloads (got '{0}')")]
    InvalidTarballUrlScheme(String),

    #[error("Invalid tarball URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("Could not prepare {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<PythonReferenceError> for RefdocsError {
    fn from(error: PythonReferenceError) -> Self {
        let message = error.to_string();
        RefdocsError::pipeline_error_with_source("Python reference", message, error)
    }
}

/// Pythonリファレンス取得の設定
#[derive(Debug, Clone)]
pub struct PythonReferenceConfig {
    /// 出力ディレクトリ
    pub out_dir: PathBuf,

    /// HTMLアーカイブのリポジトリ
    pub html_repo: RepoSlug,

    /// 展開するリリースタグ
    pub version_tags: Vec<String>,
}

impl PythonReferenceConfig {
    /// カタログのオプションから作成（出力先はワークスペース基準）
    pub fn from_options(options: &PythonReferenceOptions, workspace_root: &Path) -> Self {
        Self {
            out_dir: workspace_root.join(&options.out),
            html_repo: options.html_repo.clone(),
            version_tags: options.version_tags.clone(),
        }
    }

    /// Archive of the main branch
    pub fn latest_url(&self) -> String {
        format!(
            "https://github.com/{}/archive/refs/heads/main.tar.gz",
            self.html_repo
        )
    }

    /// Archive of a release tag
    pub fn tag_url(&self, tag: &str) -> String {
        format!(
            "https://github.com/{}/archive/refs/tags/{}.tar.gz",
            self.html_repo, tag
        )
    }
}

/// 取得結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonReferenceReport {
    /// 出力ディレクトリ
    pub out_dir: PathBuf,

    /// 書き込んだファイル数（全バージョン合計）
    pub files_written: usize,

    /// 展開したタグ
    pub versions: Vec<String>,
}

/// Assembles the Python reference from prebuilt HTML archives
pub struct PythonReferenceUseCase {
    config: PythonReferenceConfig,
    downloader: Arc<dyn TarballDownloader>,
}

impl PythonReferenceUseCase {
    /// 新しいPythonReferenceUseCaseインスタンスを作成
    pub fn new(config: PythonReferenceConfig, downloader: Arc<dyn TarballDownloader>) -> Self {
        Self { config, downloader }
    }

    /// Empty the output directory, creating it when needed
    pub async fn clean(&self) -> Result<usize, PythonReferenceError> {
        clear_directory(&self.config.out_dir)
            .await
            .map_err(|source| PythonReferenceError::Io {
                path: self.config.out_dir.display().to_string(),
                source,
            })
    }

    /// Clean, extract `main` into the output directory, then each tag into `versions/<tag>`
    pub async fn execute(&self) -> Result<PythonReferenceReport, PythonReferenceError> {
        self.clean().await?;
        info!("Building reference docs");

        let mut files_written = self
            .fetch_extract(&self.config.latest_url(), &self.config.out_dir)
            .await?;

        for tag in &self.config.version_tags {
            let dest = self.config.out_dir.join(VERSIONS_DIR).join(tag);
            files_written += self.fetch_extract(&self.config.tag_url(tag), &dest).await?;
        }

        info!("Done");
        Ok(PythonReferenceReport {
            out_dir: self.config.out_dir.clone(),
            files_written,
            versions: self.config.version_tags.clone(),
        })
    }

    /// Download the archive at `url` and extract its HTML subtree into `dest`
    pub async fn fetch_extract(&self, url: &str, dest: &Path) -> Result<usize, PythonReferenceError> {
        let parsed = Url::parse(url).map_err(|e| PythonReferenceError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if parsed.scheme() != "https" {
            return Err(PythonReferenceError::InvalidTarballUrlScheme(
                parsed.scheme().to_string(),
            ));
        }

        info!("Extracting {}", url);
        let bytes = self.downloader.download(&parsed).await?;

        let dest = dest.to_path_buf();
        let written = tokio::task::spawn_blocking(move || extract_html_dir(Cursor::new(bytes), &dest))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))??;

        Ok(written)
    }
}
