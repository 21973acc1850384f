use crate::url::LinkFilter;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Main configuration structure for Sumi-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub job: CrawlJobConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A crawl job request as submitted by a caller
///
/// Field names match the job request wire format, so the same struct parses
/// the `[job]` table of a TOML config file and a JSON job request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlJobConfig {
    /// Seed URL the crawl starts from
    pub url: String,

    /// Maximum link-follow depth from the seed
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Total page budget for the job
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// CSS selector for candidate link elements
    #[serde(default = "default_match_pattern")]
    pub match_pattern: String,

    /// CSS selector scoping content extraction
    #[serde(default = "default_content_css")]
    pub content_css: String,

    /// Only follow links on the seed's host
    #[serde(default = "default_same_domain")]
    pub same_domain: bool,

    /// Per-navigation timeout (milliseconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Links must match this regex to be followed
    #[serde(default)]
    pub url_regex: Option<String>,

    /// Links matching this regex are never followed
    #[serde(default)]
    pub exclude_regex: Option<String>,

    /// Maximum number of page sessions open at once
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_pages() -> u32 {
    10
}

fn default_match_pattern() -> String {
    "a".to_string()
}

fn default_content_css() -> String {
    "body".to_string()
}

fn default_same_domain() -> bool {
    true
}

fn default_timeout() -> u64 {
    30_000
}

fn default_concurrency() -> u32 {
    10
}

impl CrawlJobConfig {
    /// Creates a job request for `url` with every other field at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            match_pattern: default_match_pattern(),
            content_css: default_content_css(),
            same_domain: default_same_domain(),
            timeout: default_timeout(),
            url_regex: None,
            exclude_regex: None,
            concurrency: default_concurrency(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiSweep".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`, with the
    /// parenthesised part trimmed to whichever contact fields are set.
    pub fn header_value(&self) -> String {
        let contacts: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contacts.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contacts.join("; ")
            )
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the plain-text export written after the crawl
    #[serde(rename = "export-path", default)]
    pub export_path: Option<String>,
}

/// A validated, ready-to-run crawl job
///
/// Produced by [`validate_job`](crate::config::validate_job); regexes are
/// compiled and the seed is parsed, so the orchestrator never has to fail on
/// configuration once a crawl has started.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    /// Seed URL (fragment stripped)
    pub seed: Url,

    /// Maximum link-follow depth
    pub max_depth: u32,

    /// Page budget
    pub max_pages: usize,

    /// Link element selector
    pub link_selector: String,

    /// Content scope selector
    pub content_selector: String,

    /// Per-navigation timeout
    pub timeout: Duration,

    /// Concurrency limit for page sessions
    pub concurrency: usize,

    /// Compiled link policy
    pub filter: LinkFilter,
}
