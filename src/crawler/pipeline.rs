//! Page extraction pipeline
//!
//! Processing one page means: acquire a session slot, navigate, read the
//! title, content and links out of the rendered document, and close the
//! session. Every failure along the way is contained in the returned
//! [`PageResult`]; nothing here fails the job.

use crate::config::CrawlJob;
use crate::crawler::page::PageResult;
use crate::crawler::session::{Document, DocumentError, FetchError, FetchSession, Fetcher};
use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use tokio::sync::Semaphore;
use tokio::time::error::Elapsed;
use url::Url;

/// Paragraphs this short (in characters, after trimming) are dropped
const MIN_PARAGRAPH_CHARS: usize = 20;

/// Runs the full pipeline for one frontier entry
///
/// A permit from `limiter` is held for as long as the session is open, which
/// bounds the number of live sessions across the whole job. The session is
/// closed even when navigation or extraction panics.
pub async fn process_page<F: Fetcher>(
    fetcher: &F,
    limiter: &Semaphore,
    url: &Url,
    job: &CrawlJob,
) -> PageResult {
    let _permit = match limiter.acquire().await {
        Ok(permit) => permit,
        Err(_) => return PageResult::failed(url.as_str(), "Session limiter closed"),
    };

    let mut session = match fetcher.open_session().await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Could not open session for {}: {}", url, e);
            return PageResult::failed(url.as_str(), e.to_string());
        }
    };

    let attempt = AssertUnwindSafe(async {
        let navigation =
            tokio::time::timeout(job.timeout, session.navigate(url, job.timeout)).await;
        render(navigation, url, job)
    })
    .catch_unwind()
    .await;

    session.close().await;

    attempt.unwrap_or_else(|_| {
        tracing::error!("Page pipeline for {} panicked", url);
        PageResult::failed(url.as_str(), "Page task panicked")
    })
}

/// Turns a navigation outcome into a page result, consuming the document
fn render<D: Document>(
    navigation: Result<Result<D, FetchError>, Elapsed>,
    url: &Url,
    job: &CrawlJob,
) -> PageResult {
    let document = match navigation {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => {
            tracing::warn!("Navigation failed: {}", e);
            return PageResult::navigation_failed(url.as_str(), e.to_string());
        }
        Err(_) => {
            let e = FetchError::timeout(url, job.timeout);
            tracing::warn!("Navigation failed: {}", e);
            return PageResult::navigation_failed(url.as_str(), e.to_string());
        }
    };

    match extract(&document, url, job) {
        Ok(page) => {
            tracing::debug!(
                "Extracted {} ({} chars, {} links)",
                url,
                page.content.len(),
                page.links.len()
            );
            page
        }
        Err(e) => {
            tracing::warn!("Extraction failed for {}: {}", url, e);
            PageResult::failed(url.as_str(), e.to_string())
        }
    }
}

/// Reads title, content and links out of a rendered document
///
/// Title and content failures degrade to empty strings. A failing link query
/// fails the page.
pub fn extract<D: Document>(
    document: &D,
    page_url: &Url,
    job: &CrawlJob,
) -> Result<PageResult, DocumentError> {
    let title = document.title().unwrap_or_else(|e| {
        tracing::debug!("No title for {}: {}", page_url, e);
        String::new()
    });

    let content = extract_content(document, &job.content_selector);
    let links = extract_links(document, page_url, job)?;

    Ok(PageResult {
        url: page_url.to_string(),
        title,
        content,
        links,
        error: None,
    })
}

/// Content of the first `selector` match, falling back to the body text
fn extract_content<D: Document>(document: &D, selector: &str) -> String {
    match scoped_content(document, selector) {
        Ok(Some(content)) => return content,
        Ok(None) => {}
        Err(e) => tracing::debug!("Content selector failed: {}", e),
    }

    document.body_text().unwrap_or_else(|e| {
        tracing::debug!("Body text unavailable: {}", e);
        String::new()
    })
}

/// `Ok(None)` when nothing matches `selector`
fn scoped_content<D: Document>(
    document: &D,
    selector: &str,
) -> Result<Option<String>, DocumentError> {
    let Some(scope) = document.query_selector(selector)? else {
        return Ok(None);
    };

    let paragraphs = document.query_all_within(&scope, "p")?;
    if paragraphs.is_empty() {
        return document.inner_text(&scope).map(Some);
    }

    let mut kept = Vec::new();
    for paragraph in &paragraphs {
        let text = document.inner_text(paragraph)?;
        let text = text.trim();
        if text.chars().count() > MIN_PARAGRAPH_CHARS {
            kept.push(text.to_string());
        }
    }

    Ok(Some(kept.join("\n\n")))
}

/// Filtered links in first-seen order
fn extract_links<D: Document>(
    document: &D,
    page_url: &Url,
    job: &CrawlJob,
) -> Result<Vec<String>, DocumentError> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.query_all(&job.link_selector)? {
        let Some(href) = document.attribute(&element, "href")? else {
            continue;
        };

        if let Some(link) = job.filter.filter_link(&href, page_url) {
            let link = link.to_string();
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    Ok(links)
}
