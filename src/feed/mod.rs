//! Revocation feed client
//!
//! Fetches the set of revoked attestation-key serial numbers from the
//! published status endpoint.
//!
//! # Features
//! - Cache-busting request headers on every attempt
//! - Bounded retry with exponential backoff for transient failures
//! - Pluggable transport so the retry loop can run against a fake

mod client;
mod errors;
mod retry;
mod transport;
mod types;

pub use client::RevocationFeedClient;
pub use errors::{FeedError, FeedResult};
pub use retry::RetryPolicy;
pub use transport::{FeedResponse, FeedTransport, HttpFeedTransport};
pub use types::RevocationSet;

#[cfg(test)]
pub use transport::MockFeedTransport;
