use crate::domain::value_objects::RepoSlug;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Public GitHub REST endpoint.
pub const GITHUB_API_BASE: &str = "https://api.github.com/";

/// Commit lookup errors
#[derive(Debug, Error)]
pub enum CommitLookupError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Malformed commit response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Remote side of the up-to-date check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitLookup: Send + Sync {
    /// Latest commit hash of `branch` on the host
    async fn latest_commit(&self, repo: &RepoSlug, branch: &str)
        -> Result<String, CommitLookupError>;
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

/// Commit lookup backed by the GitHub REST API
pub struct GithubCommitLookup {
    http_client: reqwest::Client,
    api_base: Url,
    token: Option<String>,
}

impl GithubCommitLookup {
    /// Create a lookup against the public API, optionally authenticated
    pub fn new(token: Option<String>) -> Result<Self, CommitLookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("refdocs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| CommitLookupError::RequestFailed {
                url: GITHUB_API_BASE.to_string(),
                source,
            })?;

        let api_base = Url::parse(GITHUB_API_BASE)
            .map_err(|e| CommitLookupError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Point the lookup at another API root (GitHub Enterprise, tests)
    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, CommitLookupError> {
        self.api_base =
            Url::parse(api_base).map_err(|e| CommitLookupError::InvalidUrl(e.to_string()))?;
        Ok(self)
    }

    /// `{api_base}/repos/{owner}/{name}/commits/{branch}`
    pub fn commit_url(&self, repo: &RepoSlug, branch: &str) -> Result<Url, CommitLookupError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| CommitLookupError::InvalidUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name(), "commits", branch]);
        Ok(url)
    }
}

#[async_trait]
impl CommitLookup for GithubCommitLookup {
    async fn latest_commit(
        &self,
        repo: &RepoSlug,
        branch: &str,
    ) -> Result<String, CommitLookupError> {
        let url = self.commit_url(repo, branch)?;

        let mut request = self
            .http_client
            .get(url.clone())
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| CommitLookupError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CommitLookupError::UnexpectedStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: CommitResponse =
            response
                .json()
                .await
                .map_err(|source| CommitLookupError::MalformedResponse {
                    url: url.to_string(),
                    source,
                })?;

        Ok(body.sha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn slug() -> RepoSlug {
        RepoSlug::new("langchain-ai/langchainjs").unwrap()
    }

    /// Serves one canned HTTP response and hands back the raw request.
    async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });

        (format!("http://{}/", addr), handle)
    }

    #[test]
    fn test_commit_url() {
        let lookup = GithubCommitLookup::new(None).unwrap();
        let url = lookup.commit_url(&slug(), "main").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/langchain-ai/langchainjs/commits/main"
        );
    }

    #[test]
    fn test_commit_url_escapes_branch_separator() {
        let lookup = GithubCommitLookup::new(None).unwrap();
        let url = lookup.commit_url(&slug(), "release/v1").unwrap();
        assert!(url.as_str().ends_with("/commits/release%2Fv1"));
    }

    #[tokio::test]
    async fn test_latest_commit_reads_sha_and_sends_token() {
        let (base, server) =
            serve_once("200 OK", r#"{"sha":"abc123","commit":{"message":"m"}}"#).await;
        let lookup = GithubCommitLookup::new(Some("secret".to_string()))
            .unwrap()
            .with_api_base(&base)
            .unwrap();

        let sha = lookup.latest_commit(&slug(), "main").await.unwrap();
        assert_eq!(sha, "abc123");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /repos/langchain-ai/langchainjs/commits/main "));
        assert!(request.contains("authorization: bearer secret"));
        assert!(request.contains("user-agent: refdocs/"));
    }

    #[tokio::test]
    async fn test_error_status_is_fatal() {
        let (base, _server) = serve_once("404 Not Found", r#"{"message":"Not Found"}"#).await;
        let lookup = GithubCommitLookup::new(None)
            .unwrap()
            .with_api_base(&base)
            .unwrap();

        let result = lookup.latest_commit(&slug(), "main").await;
        assert!(matches!(
            result,
            Err(CommitLookupError::UnexpectedStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_body_without_sha_is_malformed() {
        let (base, _server) = serve_once("200 OK", r#"{"message":"odd"}"#).await;
        let lookup = GithubCommitLookup::new(None)
            .unwrap()
            .with_api_base(&base)
            .unwrap();

        let result = lookup.latest_commit(&slug(), "main").await;
        assert!(matches!(
            result,
            Err(CommitLookupError::MalformedResponse { .. })
        ));
    }
}
