use std::path::{Path, PathBuf};
use tracing::info;

/// Ensure `dir` exists and remove everything inside it.
///
/// Returns the number of top-level entries removed.
pub async fn clear_directory(dir: &Path) -> std::io::Result<usize> {
    tokio::fs::create_dir_all(dir).await?;
    info!("Cleaning {}", dir.display());

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
        removed += 1;
    }

    Ok(removed)
}

/// Empties the generated output directories
pub struct CleanOutputUseCase {
    dirs: Vec<PathBuf>,
}

impl CleanOutputUseCase {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Clear every directory; returns `(dir, removed entries)` per directory
    pub async fn execute(&self) -> std::io::Result<Vec<(PathBuf, usize)>> {
        let mut results = Vec::with_capacity(self.dirs.len());
        for dir in &self.dirs {
            let removed = clear_directory(dir).await?;
            results.push((dir.clone(), removed));
        }
        Ok(results)
    }
}
