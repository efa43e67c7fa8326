//! Data structures for the benchmark feed
//!
//! The feed is the JSON document published by github-action-benchmark:
//!
//! ```json
//! {
//!   "lastUpdate": 1700000000000,
//!   "repoUrl": "https://github.com/owner/repo",
//!   "entries": { "Benchmark": [ { "commit": {..}, "date": 1700000000000, "benches": [..] } ] }
//! }
//! ```

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::Path;

/// Prefix used when the feed is published as a script (`data.js`)
const SCRIPT_PREFIX: &str = "window.BENCHMARK_DATA =";

/// A git user as reported by GitHub
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitUser {
    /// Display name
    pub name: String,
    /// GitHub username
    pub username: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Fields not modelled here, kept so the feed round-trips
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The commit a benchmark run was recorded for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Commit {
    /// Git commit SHA
    pub id: String,
    /// Full commit message
    pub message: String,
    /// Commit timestamp, verbatim from the feed
    pub timestamp: String,
    /// Commit URL (GitHub)
    pub url: String,
    pub author: GitUser,
    pub committer: GitUser,
    /// Fields not modelled here, kept so the feed round-trips
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A single named measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkResult {
    /// Test case name
    pub name: String,
    /// The measured value
    #[serde(serialize_with = "serialize_value")]
    pub value: f64,
    /// Unit of measurement
    pub unit: String,
    /// Range/variance if available (e.g., "± 5")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Freeform annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Fields not modelled here, kept so the feed round-trips
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// One benchmark run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkEntry {
    pub commit: Commit,
    /// When the run was recorded, in milliseconds since the Unix epoch
    pub date: i64,
    pub benches: Vec<BenchmarkResult>,
    /// Fields not modelled here, kept so the feed round-trips
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl BenchmarkEntry {
    /// The run date as a UTC timestamp
    pub fn recorded_at(&self) -> DateTime<Utc> {
        millis_to_datetime(self.date)
    }
}

/// Benchmark runs as stored under `entries`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeedEntries {
    #[serde(rename = "Benchmark")]
    pub benchmark: Vec<BenchmarkEntry>,
    /// Other benchmark suites, not charted
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The root of the fetched feed
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedDocument {
    /// Last update, in milliseconds since the Unix epoch
    pub last_update: i64,
    pub repo_url: String,
    pub entries: FeedEntries,
    /// Fields not modelled here, kept so the feed round-trips
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl FeedDocument {
    /// Parse a feed from its JSON text.
    ///
    /// The script form (`window.BENCHMARK_DATA = {...};`) is accepted as well.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let trimmed = content.trim();
        let json = match trimmed.strip_prefix(SCRIPT_PREFIX) {
            Some(rest) => rest.trim().trim_end_matches(';'),
            None => trimmed,
        };

        Ok(serde_json::from_str(json)?)
    }

    /// Load a feed from a JSON (or `data.js`) file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_json_str(&content)
    }

    /// Save the feed as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// All benchmark runs in feed order
    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries.benchmark
    }

    /// The last update as a UTC timestamp
    pub fn last_updated_at(&self) -> DateTime<Utc> {
        millis_to_datetime(self.last_update)
    }
}

/// Write whole numbers back as JSON integers so `10` does not become `10.0`
fn serialize_value<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Convert epoch milliseconds, falling back to the epoch itself when out of range
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
}
