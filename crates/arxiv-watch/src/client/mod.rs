//! arXiv search page fetcher.
//!
//! Provides a plain async HTTP client:
//! - Connection pooling via reqwest
//! - Request and connect timeouts
//! - Status codes mapped onto [`ClientError`]
//!
//! Retries and rate limiting are left to whatever schedules the runs.

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::SearchQuery;

/// Fetches the raw content behind a search target.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page for `query`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status.
    async fn fetch(&self, query: &SearchQuery) -> ClientResult<String>;
}

/// reqwest-backed [`PageFetcher`].
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client.
    client: Client,

    /// User-Agent the client was built with.
    user_agent: String,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml".parse().expect("valid accept header"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client, user_agent: config.user_agent.clone() })
    }

    /// User-Agent sent with requests.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn request(&self, query: &SearchQuery) -> ClientResult<String> {
        let response = self.client.get(query.url().clone()).send().await?;
        let response = Self::handle_response(response).await?;
        Ok(response.text().await?)
    }

    /// Handle response status codes.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let url = response.url().to_string();
                Err(ClientError::not_found(url))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

#[async_trait]
impl PageFetcher for ArxivClient {
    async fn fetch(&self, query: &SearchQuery) -> ClientResult<String> {
        tracing::debug!(target_url = %query, "Fetching search page");

        let body = self
            .request(query)
            .await
            .inspect_err(|e| {
                tracing::warn!(status = ?e.status(), error = %e, "Search page request failed");
            })?;

        tracing::debug!(bytes = body.len(), "Fetched search page");
        Ok(body)
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("user_agent", &self.user_agent).finish()
    }
}
