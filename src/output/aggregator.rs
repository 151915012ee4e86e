use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// One URL judged relevant, with where it was found
///
/// Field names on disk are `url`, `sourceHost`, `foundOnPage` and
/// `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// The matching absolute URL
    pub url: String,

    /// Host of the page the link was found on
    pub source_host: String,

    /// Full URL of the page the link was found on
    pub found_on_page: String,

    /// Discovery time, RFC 3339
    pub timestamp: String,
}

impl MatchRecord {
    /// Creates a record stamped with the current time
    pub fn new(
        url: impl Into<String>,
        source_host: impl Into<String>,
        found_on_page: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            source_host: source_host.into(),
            found_on_page: found_on_page.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Append-only, thread-safe collection of match records
///
/// `record` may be called from any number of workers at once; every call
/// appends exactly one entry, in lock-acquisition order. Uniqueness of URLs
/// is guaranteed upstream by the dedup gate, not here.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Mutex<Vec<MatchRecord>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record
    pub fn record(&self, entry: MatchRecord) {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.push(entry);
    }

    /// Returns a copy of everything recorded so far
    ///
    /// Only the snapshot taken after the crawl's completion barrier is
    /// complete; earlier snapshots are for diagnostics.
    pub fn snapshot(&self) -> Vec<MatchRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
