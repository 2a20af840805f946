//! Prebuilt reference archives: download and selective extraction
pub mod download;
pub mod html_tarball;

pub use download::{HttpTarballDownloader, TarballDownloader};
pub use html_tarball::{extract_html_dir, ArchiveError, HTML_PREFIX};
