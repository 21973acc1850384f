//! Sumi-Sweep: a bounded breadth-first content sweeper
//!
//! This crate crawls a website outward from a single seed URL, extracting the
//! readable content and outbound links of every page it visits. The crawl is
//! limited by a link-follow depth and a page budget, runs pages concurrently in
//! batches, and reports progress through a message channel as it goes.

pub mod config;
pub mod crawler;
pub mod output;
pub mod progress;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Config Error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Fetcher unavailable: {0}")]
    FetcherUnavailable(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::JobState,
        to: state::JobState,
    },

    #[error("Crawl cancelled after {pages} pages")]
    Cancelled { pages: usize },

    #[error("Progress sink closed after {pages} pages")]
    SinkClosed { pages: usize },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

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

    #[error("Failed to parse job request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlJob, CrawlJobConfig};
pub use crawler::{Coordinator, CrawlResult, PageResult};
pub use progress::{ProgressEvent, ProgressReporter};
pub use state::JobState;
pub use url::{extract_domain, normalize_link, LinkFilter};
