//! Per-page crawl results

use serde::{Deserialize, Serialize};

/// Title recorded for a page whose navigation failed
pub const NAVIGATION_ERROR_TITLE: &str = "Navigation Error";

/// Title recorded for a page that failed after navigation
pub const ERROR_TITLE: &str = "Error";

/// The outcome of processing one page
///
/// Serializes to the `{url, title, content, links, error?}` wire shape; the
/// `error` key is omitted for pages that processed cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// The page URL as taken from the frontier
    pub url: String,

    /// Document title, or a failure sentinel
    pub title: String,

    /// Extracted readable content
    pub content: String,

    /// Filtered, normalized outbound links in first-seen order
    pub links: Vec<String>,

    /// Failure description for contained failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every page processed by a job, in batch completion order
pub type CrawlResult = Vec<PageResult>;

impl PageResult {
    /// A page whose navigation step failed (timeout, DNS, refused, ...)
    pub fn navigation_failed(url: &str, error: impl Into<String>) -> Self {
        Self::failure(url, NAVIGATION_ERROR_TITLE, error.into())
    }

    /// A page that failed for any other reason
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        Self::failure(url, ERROR_TITLE, error.into())
    }

    fn failure(url: &str, title: &str, error: String) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            content: String::new(),
            links: Vec::new(),
            error: Some(error),
        }
    }

    /// Returns true if this page holds a contained failure
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
