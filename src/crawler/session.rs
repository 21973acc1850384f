//! Fetcher collaborator interfaces
//!
//! The crawler never talks to a transport directly. A [`Fetcher`] hands out
//! sessions, a [`FetchSession`] navigates to a URL and yields a rendered
//! [`Document`], and the document answers title, selector, text and attribute
//! queries. Swapping the fetcher (plain HTTP, a headless browser, an in-memory
//! script for tests) leaves the crawl logic untouched.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failures while opening a session or navigating
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Timeout {timeout_ms}ms exceeded navigating to {url}")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Could not open a fetch session: {0}")]
    SessionUnavailable(String),
}

impl FetchError {
    pub fn timeout(url: &Url, timeout: Duration) -> Self {
        Self::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

/// Failures while querying a rendered document
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Document query failed: {0}")]
    Query(String),
}

/// Opens page sessions
#[async_trait]
pub trait Fetcher: Send + Sync {
    type Session: FetchSession;

    /// Acquires a fresh session for one page
    async fn open_session(&self) -> Result<Self::Session, FetchError>;
}

/// A session exclusively owned by one page task
#[async_trait]
pub trait FetchSession: Send {
    type Document: Document;

    /// Loads `url` and returns the rendered document
    ///
    /// `timeout` is the per-navigation budget; implementations should give up
    /// on their own once it elapses.
    async fn navigate(&mut self, url: &Url, timeout: Duration)
        -> Result<Self::Document, FetchError>;

    /// Releases the session
    async fn close(self);
}

/// A rendered page that can be queried
pub trait Document {
    /// A handle to one element of the document
    type Element<'a>: Clone
    where
        Self: 'a;

    /// The document title, empty when the page has none
    fn title(&self) -> Result<String, DocumentError>;

    /// First element matching `selector`
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element<'_>>, DocumentError>;

    /// Every element matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, DocumentError>;

    /// Every descendant of `scope` matching `selector`, in document order
    fn query_all_within<'a>(
        &'a self,
        scope: &Self::Element<'a>,
        selector: &str,
    ) -> Result<Vec<Self::Element<'a>>, DocumentError>;

    /// Rendered text of an element
    fn inner_text(&self, element: &Self::Element<'_>) -> Result<String, DocumentError>;

    /// Value of attribute `name`, if present
    fn attribute(
        &self,
        element: &Self::Element<'_>,
        name: &str,
    ) -> Result<Option<String>, DocumentError>;

    /// Rendered text of the whole `<body>`
    fn body_text(&self) -> Result<String, DocumentError> {
        match self.query_selector("body")? {
            Some(body) => self.inner_text(&body),
            None => Ok(String::new()),
        }
    }
}
