use reqwest::StatusCode;
use thiserror::Error;

/// Revocation feed errors. Any of them makes the feed unavailable for the run.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timeout while fetching revocation feed")]
    Timeout,

    #[error("Revocation feed returned HTTP {0}")]
    Status(StatusCode),

    #[error("Revocation feed unavailable after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: Box<FeedError> },

    #[error("Malformed revocation feed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Revocation feed payload has no `entries` field")]
    MissingEntries,
}

/// Convenient Result type alias
pub type FeedResult<T> = Result<T, FeedError>;
