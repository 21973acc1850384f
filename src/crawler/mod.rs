//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The fetcher collaborator interfaces and the HTTP implementation
//! - HTML rendering and content/link extraction
//! - The frontier and the batch coordinator
//! - Job entry points that tie validation, crawling and reporting together

mod coordinator;
mod fetcher;
mod frontier;
mod page;
mod parser;
mod pipeline;
mod session;

#[cfg(test)]
mod testing;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, HttpFetcher, HttpSession};
pub use frontier::{Frontier, FrontierEntry};
pub use page::{CrawlResult, PageResult, ERROR_TITLE, NAVIGATION_ERROR_TITLE};
pub use parser::HtmlDocument;
pub use pipeline::{extract, process_page};
pub use session::{Document, DocumentError, FetchError, FetchSession, Fetcher};

use crate::config::{validate_job, Config, CrawlJobConfig};
use crate::progress::{ProgressReporter, ProgressSink};
use crate::state::JobState;
use crate::SweepError;
use tokio::sync::watch;

/// How a job ended
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Terminal job state
    pub state: JobState,

    /// Every page processed, also for aborted jobs
    pub results: CrawlResult,

    /// Why the job aborted, if it did
    pub error: Option<SweepError>,
}

impl CrawlOutcome {
    fn aborted(error: SweepError, results: CrawlResult) -> Self {
        Self {
            state: JobState::Aborted,
            results,
            error: Some(error),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == JobState::Completed
    }

    /// The results of a completed job, or the reason it aborted
    pub fn into_result(self) -> Result<CrawlResult, SweepError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.results),
        }
    }
}

/// Runs one crawl job request against `fetcher`
///
/// The request is validated first; a configuration failure emits a single
/// `Error` event and nothing is navigated. Otherwise the coordinator runs and
/// emits either `Complete` or `Error`.
///
/// # Arguments
///
/// * `request` - The raw job request
/// * `fetcher` - Source of page sessions
/// * `reporter` - Where progress events go
/// * `cancel` - Optional external cancellation signal
pub async fn run_job<F: Fetcher>(
    request: &CrawlJobConfig,
    fetcher: F,
    reporter: ProgressReporter,
    cancel: Option<watch::Receiver<bool>>,
) -> CrawlOutcome {
    let job = match validate_job(request) {
        Ok(job) => job,
        Err(e) => return abort_before_start(reporter, e.into()),
    };

    let mut coordinator = Coordinator::new(job, fetcher, reporter);
    if let Some(cancel) = cancel {
        coordinator = coordinator.with_cancellation(cancel);
    }

    let result = coordinator.run().await;
    let state = coordinator.state();
    let results = coordinator.into_results();

    match result {
        Ok(_) => CrawlOutcome {
            state,
            results,
            error: None,
        },
        Err(e) => CrawlOutcome {
            state,
            results,
            error: Some(e),
        },
    }
}

/// Runs the configured job over HTTP, delivering events to `sink`
///
/// This is the main entry point for the binary. It will:
/// 1. Spawn the reporting task that owns the sink
/// 2. Build the HTTP fetcher
/// 3. Run the job
/// 4. Wait for every event to be delivered
pub async fn crawl<S>(
    config: &Config,
    sink: S,
    cancel: Option<watch::Receiver<bool>>,
) -> CrawlOutcome
where
    S: ProgressSink + 'static,
{
    let (reporter, reporting) = ProgressReporter::spawn(sink);

    let outcome = match HttpFetcher::new(&config.user_agent) {
        Ok(fetcher) => run_job(&config.job, fetcher, reporter, cancel).await,
        Err(e) => abort_before_start(reporter, SweepError::FetcherUnavailable(e.to_string())),
    };

    match reporting.await {
        Ok(Ok(delivered)) => tracing::debug!("Delivered {} progress events", delivered),
        Ok(Err(e)) => tracing::warn!("Progress delivery stopped early: {}", e),
        Err(e) => tracing::warn!("Reporting task failed: {}", e),
    }

    outcome
}

/// Reports a failure that happened before any page was dispatched
fn abort_before_start(reporter: ProgressReporter, error: SweepError) -> CrawlOutcome {
    tracing::error!("{}", error);
    let _ = reporter.error(error.to_string());
    CrawlOutcome::aborted(error, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::ScriptedFetcher;
    use crate::progress::ProgressEvent;

    #[tokio::test]
    async fn test_config_error_emits_single_error_event() {
        let fetcher = ScriptedFetcher::new();
        let (reporter, mut rx) = ProgressReporter::channel();
        let request = CrawlJobConfig::new("not a url");

        let outcome = run_job(&request, fetcher.clone(), reporter, None).await;

        assert_eq!(outcome.state, JobState::Aborted);
        assert!(outcome.results.is_empty());
        assert!(matches!(outcome.error, Some(SweepError::Config(_))));
        assert_eq!(fetcher.sessions_opened(), 0);

        match rx.recv().await {
            Some(ProgressEvent::Error { message }) => {
                assert!(message.starts_with("Config Error: "), "{}", message)
            }
            other => panic!("expected error event, got {:?}", other),
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_regex_is_config_error() {
        let (reporter, _rx) = ProgressReporter::channel();
        let mut request = CrawlJobConfig::new("https://example.com/");
        request.url_regex = Some("(unclosed".to_string());

        let outcome = run_job(&request, ScriptedFetcher::new(), reporter, None).await;
        assert!(matches!(outcome.error, Some(SweepError::Config(_))));
    }

    #[tokio::test]
    async fn test_successful_job_outcome() {
        let fetcher = ScriptedFetcher::new().page(
            "https://example.com/",
            "<html><head><title>Home</title></head><body><p>Hi</p></body></html>",
        );
        let (reporter, mut rx) = ProgressReporter::channel();
        let request = CrawlJobConfig::new("https://example.com/");

        let outcome = run_job(&request, fetcher, reporter, None).await;

        assert!(outcome.is_completed());
        let results = outcome.into_result().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Home");

        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert!(matches!(last, Some(ProgressEvent::Complete { ref data }) if data.len() == 1));
    }

    #[tokio::test]
    async fn test_cancelled_job_outcome_keeps_state() {
        let (reporter, _rx) = ProgressReporter::channel();
        let (_tx, cancel) = watch::channel(true);
        let request = CrawlJobConfig::new("https://example.com/");

        let outcome = run_job(&request, ScriptedFetcher::new(), reporter, Some(cancel)).await;

        assert_eq!(outcome.state, JobState::Aborted);
        assert!(matches!(outcome.into_result(), Err(SweepError::Cancelled { .. })));
    }
}
