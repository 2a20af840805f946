use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};
use thiserror::Error;
use tracing::debug;

/// Directory inside the archive that holds the rendered site.
pub const HTML_PREFIX: &str = "api_reference_build/html/";

/// Archive download and extraction errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Attempted path traversal in tar file: {0}")]
    TarPathTraversal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Extracts the `api_reference_build/html/` subtree of a gzipped tarball.
///
/// The prefix (and whatever precedes it, e.g. `repo-main/`) is stripped, only
/// regular files are written, and every member is checked before anything
/// about it touches the disk. Returns the number of files written.
pub fn extract_html_dir<R: Read>(gzipped: R, dest: &Path) -> Result<usize, ArchiveError> {
    let mut archive = tar::Archive::new(GzDecoder::new(gzipped));
    let mut written = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let member = entry.path()?.into_owned();

        if member
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(ArchiveError::TarPathTraversal(member.display().to_string()));
        }

        let name = member.to_string_lossy();
        let Some((_, relative)) = name.split_once(HTML_PREFIX) else {
            continue;
        };
        let relative = relative.trim_end_matches('/');
        if relative.is_empty() {
            continue;
        }

        let dest_path = dest.join(relative);
        debug!("{} -> {}", name, dest_path.display());
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if entry.header().entry_type().is_file() {
            let mut out = File::create(&dest_path)?;
            std::io::copy(&mut entry, &mut out)?;
            written += 1;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn file_header(size: usize) -> tar::Header {
        let mut header = tar::Header::new_gnu();
        header.set_size(size as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header
    }

    fn tarball(build: impl FnOnce(&mut tar::Builder<GzEncoder<Vec<u8>>>)) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        build(&mut builder);
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn add_file(builder: &mut tar::Builder<GzEncoder<Vec<u8>>>, path: &str, data: &[u8]) {
        let mut header = file_header(data.len());
        builder.append_data(&mut header, path, data).unwrap();
    }

    #[test]
    fn test_extracts_only_html_subtree() {
        let bytes = tarball(|b| {
            let mut dir = tar::Header::new_gnu();
            dir.set_entry_type(tar::EntryType::Directory);
            dir.set_mode(0o755);
            dir.set_size(0);
            b.append_data(&mut dir, "docs-main/api_reference_build/html/", std::io::empty())
                .unwrap();
            add_file(b, "docs-main/README.md", b"readme");
            add_file(b, "docs-main/api_reference_build/html/index.html", b"<html/>");
            add_file(b, "docs-main/api_reference_build/html/core/page.html", b"page");
        });

        let temp_dir = TempDir::new().unwrap();
        let written = extract_html_dir(bytes.as_slice(), temp_dir.path()).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap(),
            "<html/>"
        );
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("core/page.html")).unwrap(),
            "page"
        );
        assert!(!temp_dir.path().join("README.md").exists());
        assert!(!temp_dir.path().join("docs-main").exists());
    }

    #[test]
    fn test_rejects_parent_dir_members() {
        let bytes = tarball(|b| {
            let data = b"evil";
            let mut header = file_header(data.len());
            let name = b"../api_reference_build/html/evil.html";
            header.as_old_mut().name[..name.len()].copy_from_slice(name);
            header.set_cksum();
            b.append(&header, &data[..]).unwrap();
        });

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("dest");
        let result = extract_html_dir(bytes.as_slice(), &dest);

        assert!(matches!(result, Err(ArchiveError::TarPathTraversal(_))));
        assert!(!temp_dir.path().join("evil.html").exists());
    }

    #[test]
    fn test_archive_without_html_writes_nothing() {
        let bytes = tarball(|b| add_file(b, "repo-main/src/lib.py", b"x = 1"));
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(extract_html_dir(bytes.as_slice(), temp_dir.path()).unwrap(), 0);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
