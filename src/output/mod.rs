//! Output module for crawl results
//!
//! This module handles:
//! - Plain-text export of crawled pages
//! - Summaries of a finished crawl

mod export;
mod summary;

pub use export::{format_text_export, write_text_export};
pub use summary::{print_summary, CrawlSummary};

use thiserror::Error;

/// Errors that can occur while producing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Nothing to export: the crawl produced no pages")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
