//! URL handling module for Sumi-Sweep
//!
//! This module provides seed parsing, link normalization, host comparison and
//! the per-job link filter that decides which discovered links are followed.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use filter::LinkFilter;
pub use normalize::{normalize_link, parse_seed};
