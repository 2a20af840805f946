use anyhow::{Context, Result};
use colored::Colorize;

use super::CommandContext;
use crate::application::use_cases::CleanOutputUseCase;

/// Handler for the clean command
pub struct CleanCommand {
    pub context: CommandContext,
}

impl CleanCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub async fn execute(&self) -> Result<()> {
        let catalog = self.context.load_catalog()?;
        let root = &self.context.workspace_root;
        let dirs = vec![root.join(&catalog.site.out), root.join(&catalog.python.out)];

        let results = CleanOutputUseCase::new(dirs)
            .execute()
            .await
            .context("Failed to clean output directories")?;

        for (dir, removed) in results {
            println!(
                "{} Cleaned {} ({} entries removed)",
                "✓".green().bold(),
                dir.display(),
                removed
            );
        }
        Ok(())
    }
}
