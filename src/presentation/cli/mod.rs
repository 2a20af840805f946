pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;

use commands::{
    BuildCommand, CleanCommand, CommandContext, ListCommand, PythonCommand, SyncCommand,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// refdocs - Assemble a multi-package API reference site
#[derive(Parser, Debug)]
#[command(name = "refdocs")]
#[command(about = "Assemble a multi-package API reference site from many git repositories")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Workspace directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Catalog file (defaults to refdocs.yaml in the workspace, then the built-in catalog)
    #[arg(long, global = true, env = "REFDOCS_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync, install, configure and compile the JavaScript reference
    Build {
        /// Output directory (overrides site.out from the catalog)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Token for GitHub API commit lookups
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
    },

    /// Bring every repository clone up to date
    Sync {
        /// Token for GitHub API commit lookups
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
    },

    /// Show the catalog with resolved clone paths
    List,

    /// Fetch the prebuilt Python reference
    Python,

    /// Empty the generated output directories
    Clean,
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> Result<()> {
        colored::control::set_override(!self.cli.no_color);

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    fn context(&self) -> Result<CommandContext> {
        let current_dir = env::current_dir().context("Cannot determine the current directory")?;
        let workspace_root = match &self.cli.directory {
            Some(dir) => current_dir.join(dir),
            None => current_dir,
        };

        Ok(CommandContext {
            workspace_root,
            catalog_path: self.cli.catalog.clone(),
            verbose: self.cli.verbose,
        })
    }

    async fn handle_command(&self) -> Result<()> {
        let context = self.context()?;

        match &self.cli.command {
            Commands::Build { out, github_token } => {
                BuildCommand::new(context, out.clone(), github_token.clone())
                    .execute()
                    .await
            }
            Commands::Sync { github_token } => {
                SyncCommand::new(context, github_token.clone()).execute().await
            }
            Commands::List => ListCommand::new(context).execute().await,
            Commands::Python => PythonCommand::new(context).execute().await,
            Commands::Clean => CleanCommand::new(context).execute().await,
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
