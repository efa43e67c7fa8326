//! Feed retrieval
//!
//! A [`FeedSource`] produces one [`FeedDocument`] per call. The widget only
//! ever calls it once per mount.

use crate::error::{Error, Result};
use crate::feed::FeedDocument;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Where the benchmark history is published
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/swc-project/raw-data/gh-pages/benchmark-data.json";

/// Something that can produce the benchmark feed
pub trait FeedSource {
    /// Fetch and parse the feed
    fn fetch(&self) -> Result<FeedDocument>;

    /// Human readable location, used in logs
    fn describe(&self) -> String;
}

/// Fetches the feed over HTTP(S)
pub struct HttpFeedSource {
    client: reqwest::blocking::Client,
    url: Url,
}

impl HttpFeedSource {
    /// Create a source for the given URL
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "Unsupported feed URL scheme: {}",
                url.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("bench-chart"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, url })
    }

    /// Source for the published benchmark history
    pub fn published() -> Result<Self> {
        Self::new(DEFAULT_FEED_URL)
    }

    /// The URL this source fetches
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self) -> Result<FeedDocument> {
        debug!("GET {}", self.url);

        let body = self
            .client
            .get(self.url.clone())
            .send()?
            .error_for_status()
            .map_err(|e| Error::FetchError {
                url: self.url.to_string(),
                message: e.to_string(),
            })?
            .text()?;

        FeedDocument::from_json_str(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the feed from a local file
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedSource for FileFeedSource {
    fn fetch(&self) -> Result<FeedDocument> {
        debug!("Reading feed from {}", self.path.display());
        FeedDocument::load_from_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An already parsed feed, served as-is
pub struct StaticFeedSource(pub FeedDocument);

impl FeedSource for StaticFeedSource {
    fn fetch(&self) -> Result<FeedDocument> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "in-memory feed".to_string()
    }
}

/// Pick a source for a `--feed` argument: http(s) URLs are fetched, anything
/// else is treated as a local path (`file://` URLs included).
pub fn source_for(location: &str) -> Result<Box<dyn FeedSource>> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpFeedSource::new(location)?))
        }
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| Error::ConfigError(format!("Invalid file URL: {}", location)))?;
            Ok(Box::new(FileFeedSource::new(path)))
        }
        Ok(url) if url.scheme().len() > 1 => Err(Error::ConfigError(format!(
            "Unsupported feed URL scheme: {}",
            url.scheme()
        ))),
        // Relative paths fail to parse; single letter schemes are Windows drive letters
        _ => Ok(Box::new(FileFeedSource::new(location))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{"lastUpdate":1,"repoUrl":"r","entries":{"Benchmark":[]}}"#;

    #[test]
    fn test_http_source_rejects_other_schemes() {
        assert!(matches!(
            HttpFeedSource::new("ftp://example.com/data.json"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            HttpFeedSource::new("not a url"),
            Err(Error::UrlError(_))
        ));
    }

    #[test]
    fn test_default_source_uses_fixed_url() {
        let source = HttpFeedSource::published().unwrap();
        assert_eq!(source.url().as_str(), DEFAULT_FEED_URL);
    }

    #[test]
    fn test_source_for_classifies_locations() {
        assert_eq!(
            source_for("https://example.com/benchmark-data.json")
                .unwrap()
                .describe(),
            "https://example.com/benchmark-data.json"
        );
        assert_eq!(
            source_for("dev/bench/data.json").unwrap().describe(),
            "dev/bench/data.json"
        );
        assert!(source_for("ftp://example.com/data.json").is_err());
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("benchmark-data.json");
        std::fs::write(&path, FEED).unwrap();

        let feed = FileFeedSource::new(&path).fetch().unwrap();
        assert_eq!(feed.last_update, 1);
        assert!(feed.entries().is_empty());

        let by_url = Url::from_file_path(&path).unwrap();
        let feed = source_for(by_url.as_str()).unwrap().fetch().unwrap();
        assert_eq!(feed.repo_url, "r");
    }

    #[test]
    fn test_static_source() {
        let doc = FeedDocument::from_json_str(FEED).unwrap();
        assert_eq!(StaticFeedSource(doc.clone()).fetch().unwrap(), doc);
    }
}
