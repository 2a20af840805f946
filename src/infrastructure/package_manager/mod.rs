//! Dependency installation through a JavaScript package manager
use crate::infrastructure::process::{CommandExecutor, CommandExecutorError, ExecutionConfig};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Package manager errors
#[derive(Debug, Error)]
pub enum PackageManagerError {
    #[error("Could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: CommandExecutorError,
    },

    #[error("{command} failed in {dir} with exit code {exit_code}: {output}")]
    InstallFailed {
        command: String,
        dir: String,
        exit_code: i32,
        output: String,
    },
}

/// Installs dependencies in a directory
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Run the install command in `dir` with its output silenced
    async fn install(&self, dir: &Path) -> Result<(), PackageManagerError>;
}

/// Package manager driven through its command line
pub struct CommandPackageManager {
    program: String,
    install_args: Vec<String>,
}

impl CommandPackageManager {
    /// `yarn install`
    pub fn yarn() -> Self {
        Self::new("yarn", ["install"])
    }

    /// Any program plus its install arguments
    pub fn new<I, S>(program: impl Into<String>, install_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            install_args: install_args.into_iter().map(Into::into).collect(),
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.install_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl PackageManager for CommandPackageManager {
    async fn install(&self, dir: &Path) -> Result<(), PackageManagerError> {
        let config = ExecutionConfig::new()
            .with_working_directory(dir)
            .with_output_capture(true);

        let result = CommandExecutor::execute(&self.program, &self.install_args, &config)
            .await
            .map_err(|source| PackageManagerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.success {
            // Output is only surfaced when the install fails
            let mut output = result.stderr.trim().to_string();
            if output.is_empty() {
                output = result.stdout.trim().to_string();
            }
            return Err(PackageManagerError::InstallFailed {
                command: self.command_line(),
                dir: dir.display().to_string(),
                exit_code: result.exit_code,
                output,
            });
        }

        Ok(())
    }
}
