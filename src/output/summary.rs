//! Crawl summary
//!
//! A few headline numbers about a finished (or aborted) crawl, printed by the
//! binary once the job ends.

use crate::crawler::PageResult;
use crate::state::JobState;
use std::collections::HashSet;
use std::time::Duration;

/// Headline numbers for one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    /// Terminal job state
    pub state: JobState,

    /// Pages processed, failures included
    pub pages: usize,

    /// Pages holding a contained failure
    pub failed_pages: usize,

    /// Distinct links found across all pages
    pub links_discovered: usize,

    /// Total extracted content, in characters
    pub content_chars: usize,

    /// Wall-clock duration of the job
    pub duration: Duration,
}

impl CrawlSummary {
    /// Summarizes a crawl result
    pub fn from_results(state: JobState, pages: &[PageResult], duration: Duration) -> Self {
        let links: HashSet<&str> = pages
            .iter()
            .flat_map(|p| p.links.iter().map(String::as_str))
            .collect();

        Self {
            state,
            pages: pages.len(),
            failed_pages: pages.iter().filter(|p| p.is_error()).count(),
            links_discovered: links.len(),
            content_chars: pages.iter().map(|p| p.content.chars().count()).sum(),
            duration,
        }
    }

    /// Share of pages processed without a failure, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages == 0 {
            return 0.0;
        }
        ((self.pages - self.failed_pages) as f64 / self.pages as f64) * 100.0
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Status: {}", summary.state);
    println!("Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    println!("Overview:");
    println!("  Pages processed: {}", summary.pages);
    println!("  Failed pages: {}", summary.failed_pages);
    println!("  Links discovered: {}", summary.links_discovered);
    println!("  Content extracted: {} chars", summary.content_chars);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages without errors)",
        summary.success_rate(),
        summary.pages - summary.failed_pages,
        summary.pages
    );
}
