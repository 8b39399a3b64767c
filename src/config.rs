use std::{collections::HashMap, path::PathBuf, str::FromStr};

use chrono::FixedOffset;
use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FEED_URL: &str = "https://android.googleapis.com/attestation/status";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    pub bundles: BundleConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    /// Timeout applied to each individual attempt.
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub directory: PathBuf,
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output: PathBuf,
    /// Fixed offset such as `+08:00`. Local time is used when unset.
    #[serde(default)]
    pub utc_offset: Option<String>,
}

impl ReportConfig {
    /// Parses the configured timestamp offset, if any.
    pub fn offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.utc_offset
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                FixedOffset::from_str(raw).map_err(|e| {
                    ConfigError::Message(format!("invalid report.utc_offset {raw:?}: {e}"))
                })
            })
            .transpose()
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("feed.url", DEFAULT_FEED_URL)?
            .set_default("feed.timeout_secs", 30)?
            .set_default("feed.max_attempts", 5)?
            .set_default("feed.initial_backoff_ms", 1000)?
            .set_default("feed.max_backoff_ms", 16_000)?
            .set_default("bundles.directory", ".")?
            .set_default("bundles.extension", "xml")?
            .set_default("report.output", "status.csv")?
            .add_source(File::with_name("config/settings").required(false));

        // Explicit overrides keep tests isolated from the process environment
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // e.g. KEYBOX_FEED__URL or KEYBOX_REPORT__UTC_OFFSET
            builder = builder.add_source(
                Environment::with_prefix("KEYBOX")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
