//! Configuration module for Sumi-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files and JSON job requests, and turns a job request into a validated
//! [`CrawlJob`].
//!
//! # Example
//!
//! ```no_run
//! use sumi_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.job.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlJob, CrawlJobConfig, OutputConfig, UserAgentConfig};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_job_request};
pub use validation::{validate, validate_job};
