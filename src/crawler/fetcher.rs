//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests bounded by the per-navigation timeout
//! - Redirect following
//! - Error classification

use crate::config::UserAgentConfig;
use crate::crawler::parser::HtmlDocument;
use crate::crawler::session::{FetchError, FetchSession, Fetcher};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed per navigation
const MAX_REDIRECTS: usize = 10;

/// Connect timeout, independent of the per-navigation budget
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_sweep::config::UserAgentConfig;
/// use sumi_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over plain HTTP and renders them with `scraper`
///
/// All sessions share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    type Session = HttpSession;

    async fn open_session(&self) -> Result<HttpSession, FetchError> {
        Ok(HttpSession {
            client: self.client.clone(),
        })
    }
}

/// A single page's view of the shared client
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
}

#[async_trait]
impl FetchSession for HttpSession {
    type Document = HtmlDocument;

    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<HtmlDocument, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            // Error pages still render, the same way a browser shows them
            tracing::debug!("{} answered HTTP {}", url, status.as_u16());
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        Ok(HtmlDocument::parse(&body))
    }

    async fn close(self) {}
}

/// Maps a transport error onto the fetch failure kinds
fn classify_error(url: &Url, timeout: Duration, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::timeout(url, timeout)
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
