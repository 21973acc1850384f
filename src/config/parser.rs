use crate::config::types::{Config, CrawlJobConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_sweep::config::load_config;
///
/// let config = load_config(Path::new("sweep.toml")).unwrap();
/// println!("Max pages: {}", config.job.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    // Fail fast on anything that would stop the job from starting
    validate(&config)?;

    Ok(config)
}

/// Parses a JSON job request
///
/// Only the shape is checked here; the job runner validates the request so
/// that a bad request can be reported to the caller as a job-level error.
///
/// # Example
///
/// ```
/// use sumi_sweep::config::parse_job_request;
///
/// let job = parse_job_request(r#"{"url": "https://example.com/", "max_pages": 3}"#).unwrap();
/// assert_eq!(job.max_pages, 3);
/// assert_eq!(job.max_depth, 2);
/// ```
pub fn parse_job_request(json: &str) -> Result<CrawlJobConfig, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged when a job starts so runs can be matched to the exact
/// configuration that produced them.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
