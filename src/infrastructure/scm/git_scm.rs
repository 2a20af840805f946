use super::scm_interface::{ScmError, ScmOperations};
use crate::infrastructure::process::{CommandExecutor, ExecutionConfig};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Git implementation of SCM operations
///
/// Clones go through the `git` executable; commit resolution reads the clone
/// with libgit2 on the blocking pool.
pub struct GitScm {
    git_executable: String,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
        }
    }

    /// Execute a git command and check for success
    async fn execute_git_command_checked(&self, args: &[String]) -> Result<String, ScmError> {
        let config = ExecutionConfig::new().with_environment_variable("GIT_TERMINAL_PROMPT", "0");
        let result = CommandExecutor::execute(&self.git_executable, args, &config).await?;

        if !result.success {
            let command = format!("{} {}", self.git_executable, args.join(" "));
            return Err(ScmError::command_failed(
                command,
                result.exit_code,
                result.stderr.trim(),
            ));
        }

        Ok(result.stdout.trim().to_string())
    }
}

/// Resolves `branch` in the repository at `repo_path` to a commit hash.
///
/// A fresh shallow clone has the branch under `refs/heads/`; anything else
/// falls back to general revision syntax.
fn resolve_commit(repo_path: &Path, branch: &str) -> Result<String, ScmError> {
    let repo = git2::Repository::open(repo_path)?;
    let object = repo
        .revparse_single(&format!("refs/heads/{}", branch))
        .or_else(|_| repo.revparse_single(branch))?;
    let commit = object.peel_to_commit()?;
    Ok(commit.id().to_string())
}

#[async_trait]
impl ScmOperations for GitScm {
    async fn shallow_clone(
        &self,
        url: &str,
        branch: &str,
        dest_path: &Path,
    ) -> Result<(), ScmError> {
        let dest = dest_path
            .to_str()
            .ok_or_else(|| ScmError::internal("Invalid destination path"))?;

        if let Some(parent) = dest_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let args: Vec<String> = [
            "clone", "--depth", "1", "--branch", branch, "--single-branch", url, dest,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        self.execute_git_command_checked(&args).await?;
        Ok(())
    }

    async fn head_commit(&self, repo_path: &Path, branch: &str) -> Result<String, ScmError> {
        if !self.is_repository(repo_path) {
            return Err(ScmError::RepositoryNotFound {
                path: repo_path.display().to_string(),
            });
        }

        let repo_path: PathBuf = repo_path.to_path_buf();
        let branch = branch.to_string();
        tokio::task::spawn_blocking(move || resolve_commit(&repo_path, &branch))
            .await
            .map_err(|e| ScmError::internal(format!("Commit lookup task failed: {}", e)))?
    }

    async fn remove_clone(&self, repo_path: &Path) -> Result<(), ScmError> {
        match tokio::fs::remove_dir_all(repo_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }
}
