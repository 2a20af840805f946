use super::html_tarball::ArchiveError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Fetches archive bytes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TarballDownloader: Send + Sync {
    /// Download the whole archive at `url`
    async fn download(&self, url: &Url) -> Result<Vec<u8>, ArchiveError>;
}

/// Downloader over HTTPS
pub struct HttpTarballDownloader {
    http_client: reqwest::Client,
}

impl HttpTarballDownloader {
    /// Create a new downloader
    pub fn new() -> Result<Self, ArchiveError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("refdocs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|source| ArchiveError::RequestFailed {
                url: String::new(),
                source,
            })?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl TarballDownloader for HttpTarballDownloader {
    async fn download(&self, url: &Url) -> Result<Vec<u8>, ArchiveError> {
        let request_failed = |source| ArchiveError::RequestFailed {
            url: url.to_string(),
            source,
        };

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            return Err(ArchiveError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(request_failed)?;
        Ok(bytes.to_vec())
    }
}
