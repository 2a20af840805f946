pub mod build;
pub mod clean;
pub mod list;
pub mod python;
pub mod sync;

pub use build::BuildCommand;
pub use clean::CleanCommand;
pub use list::ListCommand;
pub use python::PythonCommand;
pub use sync::SyncCommand;

use crate::domain::entities::Catalog;
use crate::infrastructure::filesystem::CatalogStore;
use std::path::PathBuf;

/// Settings every subcommand shares
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// ワークスペースのルート
    pub workspace_root: PathBuf,

    /// 明示的に指定されたカタログファイル
    pub catalog_path: Option<PathBuf>,

    /// 詳細出力
    pub verbose: bool,
}

impl CommandContext {
    /// Explicit catalog, else `refdocs.yaml` in the workspace, else the built-in one
    pub fn load_catalog(&self) -> crate::Result<Catalog> {
        CatalogStore::resolve(self.catalog_path.as_deref(), &self.workspace_root)
    }
}
