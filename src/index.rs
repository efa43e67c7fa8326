//! Per test case history built from the flat feed

use crate::feed::{millis_to_datetime, BenchmarkResult, Commit, FeedDocument};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// One measurement of one test case, tagged with its run
#[derive(Debug, Clone, PartialEq)]
pub struct PerTestCaseRecord {
    pub commit: Commit,
    pub date: DateTime<Utc>,
    pub bench: BenchmarkResult,
}

/// Test case name -> ordered history, keys kept in first-seen order.
///
/// Built once from a [`FeedDocument`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryIndex {
    keys: Vec<String>,
    records: HashMap<String, Vec<PerTestCaseRecord>>,
    last_update: DateTime<Utc>,
    repo_url: String,
}

impl HistoryIndex {
    /// Group every (entry, bench) pair of the feed by bench name.
    ///
    /// Order within a test case is feed order. Values are not validated.
    pub fn build(feed: &FeedDocument) -> Self {
        let mut keys = Vec::new();
        let mut records: HashMap<String, Vec<PerTestCaseRecord>> = HashMap::new();

        for entry in feed.entries() {
            let date = millis_to_datetime(entry.date);
            for bench in &entry.benches {
                let record = PerTestCaseRecord {
                    commit: entry.commit.clone(),
                    date,
                    bench: bench.clone(),
                };

                match records.get_mut(&bench.name) {
                    Some(history) => history.push(record),
                    None => {
                        keys.push(bench.name.clone());
                        records.insert(bench.name.clone(), vec![record]);
                    }
                }
            }
        }

        debug!(
            "Indexed {} entries into {} test cases",
            feed.entries().len(),
            keys.len()
        );

        Self {
            keys,
            records,
            last_update: feed.last_updated_at(),
            repo_url: feed.repo_url.clone(),
        }
    }

    /// Test case names in the order they first appeared
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The first test case seen, if any
    pub fn first_key(&self) -> Option<&str> {
        self.keys.first().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[PerTestCaseRecord]> {
        self.records.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of test cases
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of records across all test cases
    pub fn total_records(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Iterate test cases with their history, in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PerTestCaseRecord])> {
        self.keys
            .iter()
            .filter_map(|key| self.get(key).map(|history| (key.as_str(), history)))
    }

    /// When the feed was last updated
    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }
}

impl From<&FeedDocument> for HistoryIndex {
    fn from(feed: &FeedDocument) -> Self {
        Self::build(feed)
    }
}
