use crate::common::result::IoResultExt;
use crate::domain::entities::Catalog;
use crate::RefdocsError;
use std::path::Path;

/// Default catalog file name looked up in the workspace.
pub const CATALOG_FILE: &str = "refdocs.yaml";

/// Loads the source catalog from disk
pub struct CatalogStore;

impl CatalogStore {
    /// Read and validate a catalog file.
    pub fn load(path: &Path) -> crate::Result<Catalog> {
        let contents = std::fs::read_to_string(path).with_path(path, "Failed to read catalog")?;

        Catalog::from_yaml_str(&contents).map_err(|e| match e {
            RefdocsError::CatalogError { message, source, .. } => RefdocsError::CatalogError {
                message,
                file_path: Some(path.to_path_buf()),
                source,
            },
            other => RefdocsError::catalog_error_with_source(
                "Failed to load catalog",
                Some(path.to_path_buf()),
                other,
            ),
        })
    }

    /// Explicit file, else `<workspace>/refdocs.yaml` if present, else the built-in catalog.
    pub fn resolve(explicit: Option<&Path>, workspace: &Path) -> crate::Result<Catalog> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = workspace.join(CATALOG_FILE);
        if candidate.is_file() {
            return Self::load(&candidate);
        }

        Catalog::builtin()
    }
}
