use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use super::errors::{FeedError, FeedResult};
use super::retry::RetryPolicy;
use super::transport::FeedTransport;
use super::types::RevocationSet;

/// Fetches the revocation set through a transport under a retry policy.
pub struct RevocationFeedClient<T> {
    transport: T,
    url: String,
    policy: RetryPolicy,
}

impl<T: FeedTransport> RevocationFeedClient<T> {
    pub fn new(transport: T, url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            url: url.into(),
            policy,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch and parse the current set of revoked serial numbers.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_revoked_serial_numbers(&self) -> FeedResult<RevocationSet> {
        let body = self.fetch_with_retry().await?;

        let revoked = RevocationSet::from_json(&body).inspect_err(|e| {
            error!("Failed to parse revoked keybox list: {}", e);
        })?;

        info!("Fetched {} revoked serial numbers", revoked.len());
        Ok(revoked)
    }

    async fn fetch_with_retry(&self) -> FeedResult<String> {
        let mut attempt = 1;

        loop {
            let failure = match self.transport.get(&self.url).await {
                Ok(response) if response.status.is_success() => return Ok(response.body),
                Ok(response) => FeedError::Status(response.status),
                Err(e) => e,
            };

            if !self.policy.should_retry(&failure) {
                error!("Failed to fetch revoked keybox list: {}", failure);
                return Err(failure);
            }

            if attempt >= self.policy.max_attempts {
                error!(
                    "Failed to fetch revoked keybox list after {} attempts: {}",
                    attempt, failure
                );
                return Err(FeedError::Exhausted {
                    attempts: attempt,
                    last: Box::new(failure),
                });
            }

            let delay = self.policy.backoff(attempt);
            warn!(
                "Attempt {} to fetch revoked keybox list failed: {}. Retrying in {:?}",
                attempt, failure, delay
            );
            sleep(delay).await;
            attempt += 1;
        }
    }
}
