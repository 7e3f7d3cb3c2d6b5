//! HTTP client wrapper for catalog, probe and book requests.
//!
//! This module provides the `HttpClient` struct which sends every request with
//! the configured User-Agent and a per-request timeout, and maps transport
//! failures and non-success statuses onto [`DownloadError`].

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, FALLBACK_TEXT_CHARSET};
use super::error::DownloadError;
use crate::user_agent::BROWSER_USER_AGENT;

/// HTTP client shared by the catalog lister, the format resolver and the
/// book fetcher.
///
/// This client is designed to be created once and cloned into every worker,
/// taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use bookfetch_core::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// client
///     .probe("https://gutenberg.org/files/84/84-0.txt", Duration::from_secs(5))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with the browser User-Agent.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_user_agent(BROWSER_USER_AGENT)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client sending `user_agent` with every request.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the TLS backend cannot be initialized
    /// or the User-Agent is not a valid header value.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Checks that `url` exists without transferring its body.
    ///
    /// Only a `200 OK` answer counts as available.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::HttpStatus`] for any other status, and
    /// [`DownloadError::Timeout`] / [`DownloadError::Network`] for transport
    /// failures.
    #[instrument(level = "debug", skip(self, timeout), fields(url = %url))]
    pub async fn probe(&self, url: &str, timeout: Duration) -> Result<(), DownloadError> {
        let response = self.send(Method::HEAD, url, timeout).await?;
        if response.status() != StatusCode::OK {
            return Err(DownloadError::http_status(url, response.status().as_u16()));
        }
        debug!("probe succeeded");
        Ok(())
    }

    /// Fetches `url` and decodes the body as text.
    ///
    /// The charset from `Content-Type` is honoured. Without one the body is
    /// read as ISO-8859-1, which is how older catalog text files are served.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for transport failures, non-success
    /// statuses and interrupted bodies.
    #[instrument(level = "debug", skip(self, timeout), fields(url = %url))]
    pub async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, DownloadError> {
        let response = self.get_checked(url, timeout).await?;
        response
            .text_with_charset(FALLBACK_TEXT_CHARSET)
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))
    }

    /// Fetches `url` and returns the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for transport failures, non-success
    /// statuses and interrupted bodies.
    #[instrument(level = "debug", skip(self, timeout), fields(url = %url))]
    pub async fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, DownloadError> {
        let response = self.get_checked(url, timeout).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;
        Ok(bytes.to_vec())
    }

    async fn get_checked(&self, url: &str, timeout: Duration) -> Result<Response, DownloadError> {
        let response = self.send(Method::GET, url, timeout).await?;
        if !response.status().is_success() {
            return Err(DownloadError::http_status(url, response.status().as_u16()));
        }
        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        self.client
            .request(method, url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))
    }

}
