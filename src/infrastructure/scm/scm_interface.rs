use crate::infrastructure::process::CommandExecutorError;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Local source-control operations the synchronizer depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Shallow-clone (depth 1) `branch` of `url` into `dest_path`
    async fn shallow_clone(&self, url: &str, branch: &str, dest_path: &Path)
        -> Result<(), ScmError>;

    /// Commit hash `branch` resolves to in the clone at `repo_path`
    async fn head_commit(&self, repo_path: &Path, branch: &str) -> Result<String, ScmError>;

    /// Recursively remove a clone; succeeds when nothing is there
    async fn remove_clone(&self, repo_path: &Path) -> Result<(), ScmError>;

    /// Check if a directory holds a clone
    fn is_repository(&self, path: &Path) -> bool;
}

/// SCM operation errors
#[derive(Debug, Error)]
pub enum ScmError {
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: String },

    #[error("Could not run git: {0}")]
    Spawn(#[from] CommandExecutorError),

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Git error: {source}")]
    Git {
        #[from]
        source: git2::Error,
    },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
