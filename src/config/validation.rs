use crate::config::types::{Config, CrawlJob, CrawlJobConfig, UserAgentConfig};
use crate::url::{parse_seed, LinkFilter};
use crate::ConfigError;
use std::time::Duration;
use url::Url;

/// Largest concurrency limit a job may request
const MAX_CONCURRENCY: u32 = 100;

/// Validates the entire configuration and returns the compiled job
pub fn validate(config: &Config) -> Result<CrawlJob, ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_job(&config.job)
}

/// Validates a job request and compiles it into a [`CrawlJob`]
///
/// Every check that could stop a crawl happens here, before any navigation:
/// seed URL, page budget, concurrency, timeout and both regexes.
///
/// # Example
///
/// ```
/// use sumi_sweep::config::{validate_job, CrawlJobConfig};
///
/// let job = validate_job(&CrawlJobConfig::new("https://example.com/#top")).unwrap();
/// assert_eq!(job.seed.as_str(), "https://example.com/");
/// assert_eq!(job.max_pages, 10);
/// ```
pub fn validate_job(config: &CrawlJobConfig) -> Result<CrawlJob, ConfigError> {
    let seed = parse_seed(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.url, e)))?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout == 0 {
        return Err(ConfigError::Validation(
            "timeout must be > 0ms".to_string(),
        ));
    }

    let filter = LinkFilter::new(
        seed.clone(),
        config.same_domain,
        non_empty(config.url_regex.as_deref()),
        non_empty(config.exclude_regex.as_deref()),
    )?;

    Ok(CrawlJob {
        seed,
        max_depth: config.max_depth,
        max_pages: config.max_pages as usize,
        link_selector: selector_or_default(&config.match_pattern, "a"),
        content_selector: selector_or_default(&config.content_css, "body"),
        timeout: Duration::from_millis(config.timeout),
        concurrency: config.concurrency as usize,
        filter,
    })
}

/// Treats an empty pattern the same as an absent one
fn non_empty(pattern: Option<&str>) -> Option<&str> {
    pattern.filter(|p| !p.trim().is_empty())
}

/// Falls back to `default` when a selector is blank
fn selector_or_default(selector: &str, default: &str) -> String {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(email) = &config.contact_email {
        validate_email(email)?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
