use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use crate::application::services::SyncOutcome;
use crate::application::use_cases::{BuildReferenceConfig, BuildReferenceUseCase, PipelineAdapters};
use crate::common::error::RefdocsError;

/// Handler for the sync command
pub struct SyncCommand {
    pub context: CommandContext,
    pub github_token: Option<String>,
}

impl SyncCommand {
    pub fn new(context: CommandContext, github_token: Option<String>) -> Self {
        Self {
            context,
            github_token,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let catalog = self.context.load_catalog()?;

        let config = BuildReferenceConfig::new(&self.context.workspace_root).with_sync_only(true);
        let adapters = PipelineAdapters::production(&config, self.github_token.clone())?;
        let use_case = BuildReferenceUseCase::new(config, adapters);

        println!("{} Synchronizing repositories...", "::".blue().bold());
        let report = use_case.execute(&catalog).await.map_err(RefdocsError::from)?;

        println!(
            "{} Synchronization completed! ({} remotes, {} cloned)",
            "✓".green().bold(),
            report.synced.len(),
            report.cloned_count()
        );

        if self.context.verbose {
            for (key, outcome) in &report.synced {
                let status = match outcome {
                    SyncOutcome::Cloned => "cloned".green(),
                    SyncOutcome::Recloned => "updated".yellow(),
                    SyncOutcome::UpToDate => "up to date".dimmed(),
                };
                println!("  {} {}", key, status);
            }
        }

        Ok(())
    }
}
