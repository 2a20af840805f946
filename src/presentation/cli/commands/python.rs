use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use super::CommandContext;
use crate::application::use_cases::{PythonReferenceConfig, PythonReferenceUseCase};
use crate::common::error::RefdocsError;
use crate::infrastructure::archive::HttpTarballDownloader;

/// Handler for the python command
pub struct PythonCommand {
    pub context: CommandContext,
}

impl PythonCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub async fn execute(&self) -> Result<()> {
        let catalog = self.context.load_catalog()?;
        let config = PythonReferenceConfig::from_options(&catalog.python, &self.context.workspace_root);
        let use_case = PythonReferenceUseCase::new(config, Arc::new(HttpTarballDownloader::new()?));

        println!(
            "{} Fetching the Python reference from {}...",
            "::".blue().bold(),
            catalog.python.html_repo
        );
        let report = use_case.execute().await.map_err(RefdocsError::from)?;

        println!(
            "{} Extracted {} files to {}",
            "✓".green().bold(),
            report.files_written,
            report.out_dir.display()
        );
        if self.context.verbose && !report.versions.is_empty() {
            println!("  Versions: {}", report.versions.join(", "));
        }

        Ok(())
    }
}
