/// Infrastructure layer modules
///
/// Concrete adapters for everything outside the process:
/// - GitHub commit lookups and local git clones
/// - Package manager and documentation compiler subprocesses
/// - Catalog, manifest and per-package config files
/// - Prebuilt reference archives
pub mod archive;
pub mod docgen;
pub mod filesystem;
pub mod github;
pub mod package_manager;
pub mod process;
pub mod scm;

// Re-export commonly used types
pub use archive::{HttpTarballDownloader, TarballDownloader};
pub use docgen::{DocCompiler, TypedocCli};
pub use filesystem::{CatalogStore, PackageConfigStore};
pub use github::{CommitLookup, GithubCommitLookup};
pub use package_manager::{CommandPackageManager, PackageManager};
pub use process::CommandExecutor;
pub use scm::{GitScm, ScmError, ScmOperations};
