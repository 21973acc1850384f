//! Plain-text export of crawl results
//!
//! The export is a small header describing the job followed by one block per
//! page, in crawl order.

use crate::config::CrawlJobConfig;
use crate::crawler::PageResult;
use crate::output::{OutputError, OutputResult};
use chrono::{NaiveDate, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const EXPORT_VERSION: u32 = 1;
const PAGE_RULE: &str = "------------------------";
const END_RULE: &str = "========================";

/// Writes the text export of `pages` to `output_path`
///
/// # Arguments
///
/// * `pages` - The crawl result
/// * `request` - The job request the pages were crawled with
/// * `output_path` - Path where the export should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the export
/// * `Err(OutputError::Empty)` - There were no pages to export
/// * `Err(OutputError::Io)` - Failed to write the file
pub fn write_text_export(
    pages: &[PageResult],
    request: &CrawlJobConfig,
    output_path: &Path,
) -> OutputResult<()> {
    if pages.is_empty() {
        return Err(OutputError::Empty);
    }

    let text = format_text_export(pages, request, Utc::now().date_naive());

    let mut file = File::create(output_path)?;
    file.write_all(text.as_bytes())?;

    tracing::info!("Exported {} pages to {}", pages.len(), output_path.display());
    Ok(())
}

/// Formats crawl results as the text export
///
/// ```text
/// version: 1
/// title: Crawl Export - 2024-05-01
/// url: https://example.com/
/// config: Depth=2, Pages=10, Timeout=30000
///
/// Title: Home
/// URL: https://example.com/
/// ------------------------
/// page content
/// ========================
/// ```
pub fn format_text_export(
    pages: &[PageResult],
    request: &CrawlJobConfig,
    date: NaiveDate,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("version: {}\n", EXPORT_VERSION));
    out.push_str(&format!("title: Crawl Export - {}\n", date.format("%Y-%m-%d")));
    out.push_str(&format!("url: {}\n", request.url));
    out.push_str(&format!(
        "config: Depth={}, Pages={}, Timeout={}\n\n",
        request.max_depth, request.max_pages, request.timeout
    ));

    for page in pages {
        let title = if page.title.is_empty() {
            "No Title"
        } else {
            page.title.as_str()
        };

        out.push_str(&format!("Title: {}\n", title));
        out.push_str(&format!("URL: {}\n", page.url));
        out.push_str(PAGE_RULE);
        out.push('\n');
        out.push_str(&page.content);
        out.push('\n');
        out.push_str(END_RULE);
        out.push_str("\n\n");
    }

    out
}
