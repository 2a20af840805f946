use crate::domain::entities::source::{distinct_remotes, flatten_sources, Package, Remote, Source};
use crate::domain::value_objects::{RemoteKey, RepoSlug};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use validator::Validate;

/// Catalog shipped with the binary, used when no catalog file is given.
pub const BUILTIN_CATALOG: &str = include_str!("../../../refdocs.yaml");

/// Log levels accepted by the documentation compiler.
pub const LOG_LEVELS: [&str; 5] = ["Verbose", "Info", "Warn", "Error", "None"];

/// カタログの意味的な検証エラー
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Package '{0}' is declared more than once")]
    DuplicatePackage(String),

    #[error("Package '{package}' has an invalid path '{path}': must be relative and stay inside the repository")]
    InvalidPackagePath { package: String, path: String },

    #[error("Packages '{first}' and '{second}' resolve to the same directory '{dir}'")]
    SharedPackageDirectory {
        first: String,
        second: String,
        dir: String,
    },

    #[error("Group names cannot be empty")]
    EmptyGroupName,

    #[error("Unknown log level '{0}' (expected one of Verbose, Info, Warn, Error, None)")]
    InvalidLogLevel(String),

    #[error("Invalid version tag '{0}'")]
    InvalidVersionTag(String),
}

/// サイト全体のレンダリングオプション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteOptions {
    /// 製品名
    #[validate(length(min = 1))]
    pub name: String,

    /// 公開先の正規URL
    #[validate(url)]
    pub hosted_base_url: String,

    /// 有効化するコンパイラプラグイン
    #[serde(default)]
    pub plugins: Vec<String>,

    /// 報告する最小ログレベル
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 出力ディレクトリ（ワークスペースからの相対パス）
    #[serde(default = "default_site_out")]
    pub out: PathBuf,
}

fn default_log_level() -> String {
    "Info".to_string()
}

fn default_site_out() -> PathBuf {
    PathBuf::from("dist/javascript")
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            name: "LangChain.js".to_string(),
            hosted_base_url: "https://reference.langchain.com/javascript/".to_string(),
            plugins: Vec::new(),
            log_level: default_log_level(),
            out: default_site_out(),
        }
    }
}

/// Python リファレンス（ビルド済みHTML）の取得元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonReferenceOptions {
    /// HTMLアーカイブを公開しているリポジトリ
    #[serde(default = "default_html_repo")]
    pub html_repo: RepoSlug,

    /// 出力ディレクトリ（ワークスペースからの相対パス）
    #[serde(default = "default_python_out")]
    pub out: PathBuf,

    /// `versions/<tag>` に展開するリリースタグ
    #[serde(default)]
    pub version_tags: Vec<String>,
}

fn default_html_repo() -> RepoSlug {
    RepoSlug::from_static("langchain-ai", "langchain-api-docs-html")
}

fn default_python_out() -> PathBuf {
    PathBuf::from("dist/python")
}

impl Default for PythonReferenceOptions {
    fn default() -> Self {
        Self {
            html_repo: default_html_repo(),
            out: default_python_out(),
            version_tags: Vec::new(),
        }
    }
}

/// The immutable list of documentation sources plus site options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Catalog {
    #[serde(default)]
    #[validate(nested)]
    pub site: SiteOptions,

    #[serde(default)]
    pub python: PythonReferenceOptions,

    #[validate(length(min = 1))]
    pub sources: Vec<Source>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> crate::Result<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Parses and validates a YAML catalog.
    pub fn from_yaml_str(contents: &str) -> crate::Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(contents)?;
        catalog.validate()?;
        catalog.check_sources().map_err(|e| {
            crate::RefdocsError::catalog_error_with_source("Invalid catalog", None, e)
        })?;
        Ok(catalog)
    }

    /// All packages, groups expanded in declaration order.
    pub fn packages(&self) -> Vec<&Package> {
        flatten_sources(&self.sources)
    }

    /// Distinct remotes in first-seen order.
    pub fn remotes(&self) -> Vec<Remote> {
        distinct_remotes(&self.packages())
    }

    /// Checks the invariants serde and `validator` cannot express.
    pub fn check_sources(&self) -> Result<(), CatalogError> {
        if !LOG_LEVELS.contains(&self.site.log_level.as_str()) {
            return Err(CatalogError::InvalidLogLevel(self.site.log_level.clone()));
        }

        for source in &self.sources {
            if let Source::Group(group) = source {
                if group.group.trim().is_empty() {
                    return Err(CatalogError::EmptyGroupName);
                }
            }
        }

        let mut names = HashSet::new();
        let mut dirs: HashMap<(RemoteKey, PathBuf), &str> = HashMap::new();
        for package in self.packages() {
            if !names.insert(package.package.as_str()) {
                return Err(CatalogError::DuplicatePackage(package.package.clone()));
            }

            // Configs are written concurrently, one per package directory
            let dir = (package.remote.key(), normalized(Path::new(&package.path)));
            if let Some(first) = dirs.get(&dir) {
                return Err(CatalogError::SharedPackageDirectory {
                    first: first.to_string(),
                    second: package.package.clone(),
                    dir: format!("{}:{}", dir.0, dir.1.display()),
                });
            }
            dirs.insert(dir, package.package.as_str());

            if !is_contained_relative(Path::new(&package.path)) {
                return Err(CatalogError::InvalidPackagePath {
                    package: package.package.clone(),
                    path: package.path.clone(),
                });
            }
        }

        for tag in &self.python.version_tags {
            if tag.trim().is_empty() || !is_contained_relative(Path::new(tag)) {
                return Err(CatalogError::InvalidVersionTag(tag.clone()));
            }
        }

        Ok(())
    }
}

/// `path` without `.` components, so `./libs/core` and `libs/core` compare equal.
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// True when `path` is relative and never climbs above its base.
fn is_contained_relative(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
