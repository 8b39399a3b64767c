use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde::de::IgnoredAny;

use super::errors::{FeedError, FeedResult};
use crate::serial::canonical_serial;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    entries: Option<HashMap<String, IgnoredAny>>,
}

/// Revoked serial numbers, held in canonical form for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevocationSet {
    serials: HashSet<String>,
}

impl RevocationSet {
    /// Parse the status feed body. Only the keys of `entries` are kept.
    pub fn from_json(body: &str) -> FeedResult<Self> {
        let response: StatusResponse = serde_json::from_str(body)?;
        let entries = response.entries.ok_or(FeedError::MissingEntries)?;

        Ok(entries.into_keys().collect())
    }

    /// Check membership; the argument is canonicalised first.
    pub fn contains(&self, serial: &str) -> bool {
        self.serials.contains(&canonical_serial(serial))
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for RevocationSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            serials: iter
                .into_iter()
                .map(|serial| canonical_serial(serial.as_ref()))
                .collect(),
        }
    }
}
