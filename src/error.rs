//! Error types for bench-chart

use thiserror::Error;

/// Result type alias for bench-chart operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bench-chart
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch benchmark feed from {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unknown test case: {0}")]
    UnknownTestCase(String),

    #[error("Template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
}
