//! mkt-crawler: a focused crawler for marketing content
//!
//! This crate crawls a fixed set of allow-listed domains, deduplicates every
//! discovered link, classifies links by marketing keywords and persists the
//! matches as a JSON snapshot once the crawl has fully drained.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod notify;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mkt-crawler operations
#[derive(Debug, Error)]
pub enum MktError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Failed to persist results to {path}: {source}")]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Notification error: {0}")]
    Notify(#[from] notify::NotifyError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
///
/// Any of these while resolving a discovered link means the link is skipped.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for mkt-crawler operations
pub type Result<T> = std::result::Result<T, MktError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{Classifier, KeywordClassifier};
pub use config::Config;
pub use output::{MatchRecord, ResultAggregator};
pub use state::{LinkOutcome, SeenSet};
pub use url::{extract_domain, is_allowed, normalize, DomainFilter};
