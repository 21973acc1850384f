//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the batch loop that drives a crawl job:
//! - Seeding and draining the frontier breadth-first
//! - Dispatching each batch of pages concurrently and waiting for all of them
//! - Recording results, emitting progress and enqueueing discovered links
//! - Handling cancellation and a disconnected progress sink

use crate::config::CrawlJob;
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::page::{CrawlResult, PageResult};
use crate::crawler::pipeline::process_page;
use crate::crawler::session::Fetcher;
use crate::progress::ProgressReporter;
use crate::state::JobState;
use crate::SweepError;
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use url::Url;

/// Main crawler coordinator structure
///
/// Owns everything mutable about a job (frontier, visited set, results) and is
/// the only thing that touches it. Page tasks only ever see shared references
/// to the job and the fetcher.
pub struct Coordinator<F: Fetcher> {
    job: CrawlJob,
    fetcher: F,
    frontier: Frontier,
    limiter: Semaphore,
    reporter: ProgressReporter,
    cancel: Option<watch::Receiver<bool>>,
    state: JobState,
    results: CrawlResult,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `job` - The validated crawl job
    /// * `fetcher` - Source of page sessions
    /// * `reporter` - Where progress events go
    pub fn new(job: CrawlJob, fetcher: F, reporter: ProgressReporter) -> Self {
        let limiter = Semaphore::new(job.concurrency);

        Self {
            job,
            fetcher,
            frontier: Frontier::new(),
            limiter,
            reporter,
            cancel: None,
            state: JobState::Idle,
            results: Vec::new(),
        }
    }

    /// Stops dispatching new batches once `cancel` turns `true`
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Results gathered so far, also after an aborted run
    pub fn results(&self) -> &[PageResult] {
        &self.results
    }

    pub fn into_results(self) -> CrawlResult {
        self.results
    }

    /// Runs the job to completion
    ///
    /// Emits `Complete` on success. Any job-level failure aborts the job,
    /// emits a single `Error` event and is returned; results gathered before
    /// the failure stay available through [`Coordinator::results`].
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of pages processed
    /// * `Err(SweepError)` - The job aborted
    pub async fn run(&mut self) -> Result<usize, SweepError> {
        if let Err(e) = self.transition(JobState::Running) {
            let _ = self.reporter.error(e.to_string());
            return Err(e);
        }

        tracing::info!(
            "Starting crawl of {} (depth {}, budget {}, concurrency {})",
            self.job.seed,
            self.job.max_depth,
            self.job.max_pages,
            self.job.concurrency
        );
        let start_time = Instant::now();
        self.frontier.push(self.job.seed.clone(), 0);

        match self.crawl_loop().await {
            Ok(()) => {
                self.transition(JobState::Completed)?;
                tracing::info!(
                    "Crawl completed: {} pages in {:?} ({} URLs discovered)",
                    self.results.len(),
                    start_time.elapsed(),
                    self.frontier.visited_count()
                );
                if self.reporter.complete(self.results.clone()).is_err() {
                    tracing::warn!("Progress sink closed before the result was delivered");
                }
                Ok(self.results.len())
            }
            Err(e) => {
                self.transition(JobState::Aborted)?;
                tracing::warn!("Crawl aborted after {} pages: {}", self.results.len(), e);
                let _ = self.reporter.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Dispatches batches until the frontier drains or the budget is spent
    async fn crawl_loop(&mut self) -> Result<(), SweepError> {
        while !self.frontier.is_empty() && self.results.len() < self.job.max_pages {
            self.check_interrupted()?;

            let width = self
                .job
                .concurrency
                .min(self.job.max_pages - self.results.len())
                .min(self.frontier.len());
            let batch = self.frontier.pop_up_to(width);
            let Some(first) = batch.first() else {
                break;
            };

            let message = format!("Crawling batch of {} (Depth {})...", batch.len(), first.depth);
            tracing::debug!("{}", message);
            if self.reporter.status(message).is_err() {
                return Err(SweepError::SinkClosed {
                    pages: self.results.len(),
                });
            }

            let pages = run_batch(&self.fetcher, &self.limiter, &self.job, &batch).await;
            self.record_batch(batch, pages);
        }

        Ok(())
    }

    /// Appends a finished batch in dispatch order and enqueues its links
    fn record_batch(&mut self, batch: Vec<FrontierEntry>, pages: Vec<PageResult>) {
        for (entry, page) in batch.into_iter().zip(pages) {
            if entry.depth < self.job.max_depth {
                for link in &page.links {
                    match Url::parse(link) {
                        Ok(url) => {
                            self.frontier.push(url, entry.depth + 1);
                        }
                        Err(e) => tracing::debug!("Dropping unparsable link {}: {}", link, e),
                    }
                }
            }

            let title = page.title.clone();
            self.results.push(page);

            // A closed sink is noticed before the next batch
            let _ = self
                .reporter
                .progress(self.results.len(), self.job.max_pages, title);
        }
    }

    fn check_interrupted(&self) -> Result<(), SweepError> {
        let pages = self.results.len();

        if let Some(cancel) = &self.cancel {
            if *cancel.borrow() {
                return Err(SweepError::Cancelled { pages });
            }
        }

        if self.reporter.is_closed() {
            return Err(SweepError::SinkClosed { pages });
        }

        Ok(())
    }

    fn transition(&mut self, to: JobState) -> Result<(), SweepError> {
        if !self.state.can_transition_to(to) {
            return Err(SweepError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        tracing::debug!("Job state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }
}

/// Runs the pipeline for every entry concurrently and waits for all of them
///
/// Results come back in the same order as `batch`. Panics inside the pipeline
/// are contained by [`process_page`]; anything escaping it still becomes an
/// error page here.
async fn run_batch<F: Fetcher>(
    fetcher: &F,
    limiter: &Semaphore,
    job: &CrawlJob,
    batch: &[FrontierEntry],
) -> Vec<PageResult> {
    let tasks = batch.iter().map(|entry| {
        AssertUnwindSafe(process_page(fetcher, limiter, &entry.url, job))
            .catch_unwind()
            .map(move |outcome| {
                outcome.unwrap_or_else(|_| {
                    tracing::error!("Page task for {} panicked", entry.url);
                    PageResult::failed(entry.url.as_str(), "Page task panicked")
                })
            })
    });

    join_all(tasks).await
}
