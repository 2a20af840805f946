use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::CommandContext;
use crate::application::use_cases::build_reference::REPOS_DIR;
use crate::domain::entities::{Catalog, Package, Source};

/// Handler for the list command
pub struct ListCommand {
    pub context: CommandContext,
}

impl ListCommand {
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    pub async fn execute(&self) -> Result<()> {
        let catalog = self.context.load_catalog()?;
        print!("{}", render_catalog(&catalog, &self.context.workspace_root.join(REPOS_DIR)));
        Ok(())
    }
}

fn render_package(package: &Package, repos_root: &Path, indent: &str) -> String {
    let mut line = format!(
        "{}{} {} {}",
        indent,
        package.package.bold(),
        format!("({})", package.remote.key()).dimmed(),
        package.local_path(repos_root).display()
    );
    if package.package_install {
        line.push_str(&format!(" {}", "[packageInstall]".cyan()));
    }
    line.push('\n');
    line
}

/// Groups and packages in declaration order, one package per line.
pub fn render_catalog(catalog: &Catalog, repos_root: &Path) -> String {
    let mut out = String::new();
    for source in &catalog.sources {
        match source {
            Source::Package(package) => out.push_str(&render_package(package, repos_root, "")),
            Source::Group(group) => {
                out.push_str(&format!("{}\n", group.group.blue().bold()));
                for package in &group.items {
                    out.push_str(&render_package(package, repos_root, "  "));
                }
            }
        }
    }
    out.push_str(&format!(
        "{} packages from {} remotes\n",
        catalog.packages().len(),
        catalog.remotes().len()
    ));
    out
}
