use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::errors::{FeedError, FeedResult};

/// Raw answer of a single feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Interface for issuing one GET against the feed endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn get(&self, url: &str) -> FeedResult<FeedResponse>;
}

/// An HTTP-based implementation of `FeedTransport`.
///
/// Every request carries headers that stop intermediaries from serving a
/// cached copy of the feed.
#[derive(Debug, Clone)]
pub struct HttpFeedTransport {
    client: Client,
}

impl HttpFeedTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> FeedResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    async fn get(&self, url: &str) -> FeedResult<FeedResponse> {
        debug!("Requesting revocation feed from {}", url);

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "max-age=0, no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0")
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;

        Ok(FeedResponse { status, body })
    }
}

fn map_request_error(error: reqwest::Error) -> FeedError {
    if error.is_timeout() {
        FeedError::Timeout
    } else {
        FeedError::Http(error)
    }
}
