//! One batch pass: fetch the revocation set, classify every bundle, write the
//! report.

use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use config::ConfigError;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::feed::{FeedError, FeedTransport, HttpFeedTransport, RetryPolicy, RevocationFeedClient};
use crate::keybox::{BundleEvaluator, Verdict};
use crate::report::{Report, ReportError, ReportWriter, timestamp_now};

/// Run-level failures. None of them leaves a partial report behind.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Revocation feed unavailable: {0}")]
    FeedUnavailable(#[from] FeedError),

    #[error("Cannot write report: {0}")]
    OutputWrite(#[from] ReportError),

    #[error("Failed to list bundles in {path}: {source}")]
    Discovery {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] FeedError),
}

/// Counters for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub valid: usize,
    pub revoked: usize,
    pub failed: usize,
    pub output: PathBuf,
}

pub struct KeyboxChecker<T> {
    feed: RevocationFeedClient<T>,
    evaluator: BundleEvaluator,
    writer: ReportWriter,
    utc_offset: Option<FixedOffset>,
}

impl KeyboxChecker<HttpFeedTransport> {
    pub fn from_config(config: &Config) -> Result<Self, CheckError> {
        let utc_offset = config.report.offset()?;
        let transport = HttpFeedTransport::new(Duration::from_secs(config.feed.timeout_secs))
            .map_err(CheckError::HttpClient)?;
        let feed = RevocationFeedClient::new(
            transport,
            config.feed.url.clone(),
            RetryPolicy::from(&config.feed),
        );

        Ok(Self::new(
            feed,
            BundleEvaluator::from(&config.bundles),
            ReportWriter::new(&config.report.output)?,
            utc_offset,
        ))
    }
}

impl<T: FeedTransport> KeyboxChecker<T> {
    pub fn new(
        feed: RevocationFeedClient<T>,
        evaluator: BundleEvaluator,
        writer: ReportWriter,
        utc_offset: Option<FixedOffset>,
    ) -> Self {
        Self {
            feed,
            evaluator,
            writer,
            utc_offset,
        }
    }

    /// Execute one full pass.
    ///
    /// The feed is fetched before anything else; if it is unavailable the run
    /// stops without touching the output path.
    pub async fn run(&self) -> Result<RunSummary, CheckError> {
        let revoked = self.feed.fetch_revoked_serial_numbers().await?;

        let files = self
            .evaluator
            .discover()
            .map_err(|source| CheckError::Discovery {
                path: self.evaluator.directory().to_path_buf(),
                source,
            })?;
        info!("Checking {} keybox file(s)", files.len());

        let mut summary = RunSummary {
            output: self.writer.path().to_path_buf(),
            ..RunSummary::default()
        };
        let mut rows = Vec::new();

        for path in &files {
            match self.evaluator.evaluate(path, &revoked).await {
                Ok(Verdict::Valid(row)) => {
                    summary.valid += 1;
                    rows.push(row);
                }
                Ok(Verdict::Revoked { .. }) => summary.revoked += 1,
                Err(_) => summary.failed += 1,
            }
        }

        let report = Report::new(rows, timestamp_now(self.utc_offset));
        self.writer.write(&report).await?;

        Ok(summary)
    }
}
