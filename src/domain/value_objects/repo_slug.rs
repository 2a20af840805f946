use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9-]*)/([A-Za-z0-9_.-]+)$").expect("slug pattern compiles")
});

/// RepoSlug関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RepoSlugError {
    #[error("Repository slug cannot be empty")]
    Empty,

    #[error("Invalid repository slug '{0}': expected 'owner/name'")]
    InvalidFormat(String),

    #[error("Repository name cannot be '.' or '..': {0}")]
    DotName(String),
}

/// `owner/name` 形式のリポジトリ識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    /// 新しいRepoSlugインスタンスを作成
    pub fn new(slug: &str) -> Result<Self, RepoSlugError> {
        let trimmed = slug.trim();
        if trimmed.is_empty() {
            return Err(RepoSlugError::Empty);
        }

        let captures = SLUG_PATTERN
            .captures(trimmed)
            .ok_or_else(|| RepoSlugError::InvalidFormat(trimmed.to_string()))?;

        let owner = captures[1].to_string();
        let name = captures[2].to_string();
        if name == "." || name == ".." {
            return Err(RepoSlugError::DotName(trimmed.to_string()));
        }

        Ok(Self { owner, name })
    }

    /// 検証済みの固定値から作成（既定値用）
    pub(crate) fn from_static(owner: &'static str, name: &'static str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// オーナー（組織またはユーザー）名
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// リポジトリ名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTTPSクローンURL
    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.name)
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = RepoSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
