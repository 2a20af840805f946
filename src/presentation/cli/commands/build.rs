use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use super::CommandContext;
use crate::application::services::CompileOutcome;
use crate::application::use_cases::{
    BuildReferenceConfig, BuildReferenceUseCase, BuildReport, PipelineAdapters,
};
use crate::common::error::RefdocsError;

/// Handler for the build command
pub struct BuildCommand {
    pub context: CommandContext,
    pub out_dir: Option<PathBuf>,
    pub github_token: Option<String>,
}

impl BuildCommand {
    pub fn new(context: CommandContext, out_dir: Option<PathBuf>, github_token: Option<String>) -> Self {
        Self {
            context,
            out_dir,
            github_token,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let catalog = self.context.load_catalog()?;

        let mut config = BuildReferenceConfig::new(&self.context.workspace_root);
        if let Some(out_dir) = &self.out_dir {
            config = config.with_out_dir(out_dir);
        }

        let adapters = PipelineAdapters::production(&config, self.github_token.clone())?;
        let use_case = BuildReferenceUseCase::new(config, adapters);

        println!(
            "{} Building reference docs for {} packages...",
            "::".blue().bold(),
            catalog.packages().len()
        );

        let report = use_case.execute(&catalog).await.map_err(RefdocsError::from)?;
        self.print_report(&report);
        Ok(())
    }

    fn print_report(&self, report: &BuildReport) {
        match &report.compile {
            Some(CompileOutcome::Written { out, entry_points }) => {
                println!(
                    "{} Wrote docs for {} packages to {}",
                    "✓".green().bold(),
                    entry_points,
                    out.display()
                );
            }
            Some(CompileOutcome::NothingGenerated) | None => {
                println!("{} Nothing was generated", "⚠".yellow().bold());
            }
        }

        if self.context.verbose {
            println!("  Remotes synchronized: {}", report.synced.len());
            println!("  Fresh clones: {}", report.cloned_count());
            println!("  Installs: {}", report.installed.len());
            println!("  Package configs written: {}", report.configs.len());
        }
    }
}
