use crate::domain::entities::{
    PackageDocConfig, PackageManifest, PACKAGE_MANIFEST_FILE, TYPEDOC_CONFIG_FILE,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Package manifest not found at path: {0}")]
    ManifestNotFound(String),

    #[error("Malformed package manifest {path}: {source}")]
    ManifestMalformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed documentation config {path}: {message}")]
    DocConfigMalformed { path: String, message: String },

    #[error("Configuration file read failed: {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file write failed: {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reads package manifests and reads/writes per-package `typedoc.json`
#[derive(Debug, Clone, Default)]
pub struct PackageConfigStore;

impl PackageConfigStore {
    /// Create a new store
    pub fn new() -> Self {
        Self
    }

    /// Manifest path inside a package directory
    pub fn manifest_path(package_dir: &Path) -> PathBuf {
        package_dir.join(PACKAGE_MANIFEST_FILE)
    }

    /// Documentation config path inside a package directory
    pub fn doc_config_path(package_dir: &Path) -> PathBuf {
        package_dir.join(TYPEDOC_CONFIG_FILE)
    }

    /// Load `package.json`; a missing or malformed manifest is an error
    pub async fn read_manifest(&self, package_dir: &Path) -> Result<PackageManifest, ConfigStoreError> {
        let path = Self::manifest_path(package_dir);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigStoreError::ManifestNotFound(path.display().to_string()))
            }
            Err(source) => {
                return Err(ConfigStoreError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigStoreError::ManifestMalformed {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load `typedoc.json`, or an empty config when the file is absent
    pub async fn read_doc_config(&self, package_dir: &Path) -> Result<PackageDocConfig, ConfigStoreError> {
        let path = Self::doc_config_path(package_dir);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(PackageDocConfig::default())
            }
            Err(source) => {
                return Err(ConfigStoreError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(PackageDocConfig::from_map(map)),
            Ok(_) => Err(ConfigStoreError::DocConfigMalformed {
                path: path.display().to_string(),
                message: "expected a JSON object".to_string(),
            }),
            Err(e) => Err(ConfigStoreError::DocConfigMalformed {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Write `typedoc.json` pretty-printed with a single trailing newline
    pub async fn write_doc_config(
        &self,
        package_dir: &Path,
        config: &PackageDocConfig,
    ) -> Result<PathBuf, ConfigStoreError> {
        let path = Self::doc_config_path(package_dir);
        let text = config.to_pretty_string()?;
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| ConfigStoreError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_manifest_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = PackageConfigStore::new().read_manifest(temp_dir.path()).await;
        assert!(matches!(result, Err(ConfigStoreError::ManifestNotFound(_))));
    }

    #[tokio::test]
    async fn test_malformed_manifest_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("package.json"), "{ not json").unwrap();

        let result = PackageConfigStore::new().read_manifest(temp_dir.path()).await;
        assert!(matches!(
            result,
            Err(ConfigStoreError::ManifestMalformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_absent_doc_config_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = PackageConfigStore::new()
            .read_doc_config(temp_dir.path())
            .await
            .unwrap();
        assert_eq!(config, PackageDocConfig::default());
    }

    #[tokio::test]
    async fn test_non_object_doc_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("typedoc.json"), "[1, 2]").unwrap();

        let result = PackageConfigStore::new()
            .read_doc_config(temp_dir.path())
            .await;
        assert!(matches!(
            result,
            Err(ConfigStoreError::DocConfigMalformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_then_read_doc_config() {
        let temp_dir = TempDir::new().unwrap();
        let store = PackageConfigStore::new();
        let config = PackageDocConfig::default().merge_defaults(&["./src/index.ts".to_string()]);

        let path = store.write_doc_config(temp_dir.path(), &config).await.unwrap();
        assert_eq!(path, temp_dir.path().join("typedoc.json"));

        let reread = store.read_doc_config(temp_dir.path()).await.unwrap();
        assert_eq!(reread.get("entryPoints"), Some(&json!(["./src/index.ts"])));
        assert_eq!(reread.get("skipErrorChecking"), Some(&json!(true)));
    }
}
