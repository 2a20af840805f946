pub mod config_materializer;
pub mod dependency_installer;
pub mod doc_builder;
pub mod repository_synchronizer;

pub use config_materializer::{ConfigMaterializer, MaterializeError, MaterializedConfig};
pub use dependency_installer::{plan_install_targets, DependencyInstaller, InstallError, InstallTarget};
pub use doc_builder::{CompileError, CompileOutcome, DocBuilder};
pub use repository_synchronizer::{RepositorySynchronizer, SyncError, SyncOutcome};
