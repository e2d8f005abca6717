//! Article fetching from URLs and local files.
//!
//! [`Fetcher`] is the seam between the batch driver and the outside world: it
//! turns a source string into cleaned article text or an error. The
//! production implementation, [`PageFetcher`], downloads `http(s)` URLs,
//! reads anything else as a local HTML file, and runs the extractor on the
//! result.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::extract::extract_article_text;
use crate::{LexiscoreError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 10, user_agent: "Mozilla/5.0 (compatible; Lexiscore/1.0)".to_string() }
    }
}

/// Produces cleaned article text for a source.
///
/// Implementations must not panic on bad input; every failure is reported
/// through the returned `Result` so the batch can move on to the next row.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, source: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Whether a source should be fetched over HTTP.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Builds the HTTP client shared by all requests of a [`PageFetcher`].
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(LexiscoreError::HttpError)
}

/// Fetches HTML content from a URL with a one-off client.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let client = build_client(config)?;
    fetch_url_with_client(&client, url, config).await
}

/// Fetches HTML content from a URL.
///
/// Performs a single GET request; redirects are followed and the client's
/// timeout bounds the whole exchange. Non-success statuses and non-textual
/// content types are errors.
pub async fn fetch_url_with_client(client: &Client, url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| LexiscoreError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(LexiscoreError::InvalidUrl(format!(
            "unsupported scheme `{}` (expected http or https)",
            parsed_url.scheme()
        )));
    }

    let response = client
        .get(parsed_url)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| timeout_or_http(e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LexiscoreError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    if let Some(content_type) = response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
        && !is_textual(content_type)
    {
        return Err(LexiscoreError::UnsupportedContentType(content_type.to_string()));
    }

    response.text().await.map_err(|e| timeout_or_http(e, config))
}

fn timeout_or_http(err: reqwest::Error, config: &FetchConfig) -> LexiscoreError {
    if err.is_timeout() { LexiscoreError::Timeout { timeout: config.timeout } } else { LexiscoreError::HttpError(err) }
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub async fn fetch_file(path: &str) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(LexiscoreError::FileNotFound(PathBuf::from(path))),
        Err(e) => Err(e.into()),
    }
}

/// Fetches pages over HTTP or from disk and extracts their article text.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    config: FetchConfig,
}

impl PageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches the raw HTML of a source.
    pub async fn fetch_html(&self, source: &str) -> Result<String> {
        if is_remote(source) {
            fetch_url_with_client(&self.client, source, &self.config).await
        } else {
            fetch_file(source).await
        }
    }
}

impl Fetcher for PageFetcher {
    async fn fetch(&self, source: &str) -> Result<String> {
        let html = self.fetch_html(source).await?;
        extract_article_text(&html)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(future)
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 10);
        assert!(config.user_agent.contains("Lexiscore"));
    }

    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = block_on(fetch_url("not-a-url", &config));
        assert!(matches!(result, Err(LexiscoreError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_url_unsupported_scheme() {
        let config = FetchConfig::default();
        let result = block_on(fetch_url("ftp://example.com/file", &config));
        assert!(matches!(result, Err(LexiscoreError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = block_on(fetch_file("/nonexistent/path/file.html"));
        assert!(matches!(result, Err(LexiscoreError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_file_reads_on_runtime() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        fs::write(&path, "<p>Local page.</p>").unwrap();

        let html = fetch_file(path.to_str().unwrap()).await.unwrap();
        assert_eq!(html, "<p>Local page.</p>");
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://example.com"));
        assert!(is_remote("https://example.com/a"));
        assert!(!is_remote("articles/page.html"));
        assert!(!is_remote("ftp://example.com"));
    }

    #[test]
    fn test_is_textual() {
        assert!(is_textual("text/html; charset=utf-8"));
        assert!(is_textual("application/xhtml+xml"));
        assert!(is_textual("text/plain"));
        assert!(!is_textual("application/pdf"));
        assert!(!is_textual("image/png"));
    }

    #[test]
    fn test_page_fetcher_local_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        fs::write(&path, "<h1>Title</h1><p>Body text.</p>").unwrap();

        let fetcher = PageFetcher::new(FetchConfig::default()).unwrap();
        let text = block_on(fetcher.fetch(path.to_str().unwrap())).unwrap();
        assert_eq!(text, "Title Body text.");
    }

    #[test]
    fn test_page_fetcher_local_file_without_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.html");
        fs::write(&path, "<div>nothing</div>").unwrap();

        let fetcher = PageFetcher::new(FetchConfig::default()).unwrap();
        let result = block_on(fetcher.fetch(path.to_str().unwrap()));
        assert!(matches!(result, Err(LexiscoreError::NoContent)));
    }
}
