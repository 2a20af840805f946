use crate::domain::value_objects::{BranchName, RemoteKey, RepoSlug};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// ブランチ未指定時に使用するブランチ名
pub const DEFAULT_BRANCH: &str = "main";

/// リモートリポジトリとブランチの組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    /// `owner/name` 形式のリポジトリ
    pub repo: RepoSlug,

    /// ブランチ名（省略時は `main`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchName>,
}

impl Remote {
    /// 新しいRemoteインスタンスを作成
    pub fn new(repo: RepoSlug) -> Self {
        Self { repo, branch: None }
    }

    /// ブランチを設定
    pub fn with_branch(mut self, branch: BranchName) -> Self {
        self.branch = Some(branch);
        self
    }

    /// 有効なブランチ名を取得
    pub fn branch(&self) -> &str {
        self.branch
            .as_ref()
            .map(BranchName::as_str)
            .unwrap_or(DEFAULT_BRANCH)
    }

    /// 同期・インストールの重複排除に使うキー
    pub fn key(&self) -> RemoteKey {
        RemoteKey::new(&self.repo.to_string(), self.branch())
    }

    /// ローカルクローンのディレクトリ
    pub fn local_path(&self, repos_root: &Path) -> PathBuf {
        repos_root.join(self.key().dir_name())
    }
}

/// ドキュメント対象の単一パッケージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// 公開パッケージ名
    pub package: String,

    /// リポジトリ内のパッケージルート（相対パス）
    pub path: String,

    /// パッケージのリモート
    #[serde(flatten)]
    pub remote: Remote,

    /// 依存関係をリポジトリルートではなくパッケージディレクトリでインストールするか
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub package_install: bool,
}

impl Package {
    /// 新しいPackageインスタンスを作成
    pub fn new(package: impl Into<String>, path: impl Into<String>, remote: Remote) -> Self {
        Self {
            package: package.into(),
            path: path.into(),
            remote,
            package_install: false,
        }
    }

    /// パッケージ単位のインストールを設定
    pub fn with_package_install(mut self, package_install: bool) -> Self {
        self.package_install = package_install;
        self
    }

    /// パッケージのローカルディレクトリ（リモートのクローン + path）
    pub fn local_path(&self, repos_root: &Path) -> PathBuf {
        self.remote.local_path(repos_root).join(&self.path)
    }
}

/// 表示用にパッケージをまとめる名前付きグループ（1階層のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGroup {
    /// グループ名
    pub group: String,

    /// グループに含まれるパッケージ
    pub items: Vec<Package>,
}

/// カタログのエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Group(PackageGroup),
    Package(Package),
}

/// Expands groups in declaration order, yielding every package exactly once.
pub fn flatten_sources(sources: &[Source]) -> Vec<&Package> {
    let mut packages = Vec::new();
    for source in sources {
        match source {
            Source::Package(package) => packages.push(package),
            Source::Group(group) => packages.extend(group.items.iter()),
        }
    }
    packages
}

/// Distinct remotes of `packages` in first-seen order.
pub fn distinct_remotes(packages: &[&Package]) -> Vec<Remote> {
    let mut seen: HashSet<RemoteKey> = HashSet::new();
    packages
        .iter()
        .filter(|package| seen.insert(package.remote.key()))
        .map(|package| package.remote.clone())
        .collect()
}
