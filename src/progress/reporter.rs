//! Progress reporter: the orchestrator's side of the progress channel
//!
//! The orchestrator never talks to a sink directly. It pushes events into an
//! unbounded channel and a separate reporting task drains the channel into
//! the sink, so a slow transport never stalls the crawl.

use crate::crawler::PageResult;
use crate::progress::events::ProgressEvent;
use crate::progress::sinks::{ProgressSink, SinkError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The receiving side of the progress channel has gone away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReporterClosed;

/// Sends progress events towards the reporting task
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressReporter {
    /// Creates a reporter and the raw receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Creates a reporter whose events are forwarded to `sink` by a spawned task
    ///
    /// The task ends once every reporter clone is dropped and the channel is
    /// drained, or as soon as the sink fails. It returns the number of events
    /// delivered.
    pub fn spawn<S>(sink: S) -> (Self, JoinHandle<Result<usize, SinkError>>)
    where
        S: ProgressSink + 'static,
    {
        let (reporter, rx) = Self::channel();
        let handle = tokio::spawn(forward(rx, sink));
        (reporter, handle)
    }

    /// Queues an event for delivery
    pub fn emit(&self, event: ProgressEvent) -> Result<(), ReporterClosed> {
        self.tx.send(event).map_err(|_| ReporterClosed)
    }

    pub fn status(&self, message: impl Into<String>) -> Result<(), ReporterClosed> {
        self.emit(ProgressEvent::status(message))
    }

    pub fn progress(
        &self,
        current: usize,
        total: usize,
        last_scraped: impl Into<String>,
    ) -> Result<(), ReporterClosed> {
        self.emit(ProgressEvent::Progress {
            current,
            total,
            last_scraped: last_scraped.into(),
        })
    }

    pub fn complete(&self, data: Vec<PageResult>) -> Result<(), ReporterClosed> {
        self.emit(ProgressEvent::Complete { data })
    }

    pub fn error(&self, message: impl Into<String>) -> Result<(), ReporterClosed> {
        self.emit(ProgressEvent::error(message))
    }

    /// Returns true once nobody is listening any more
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Drains `rx` into `sink` until the channel closes or the sink fails
///
/// Dropping `rx` on a sink failure closes the channel, which the orchestrator
/// observes through [`ProgressReporter::is_closed`].
pub async fn forward<S>(
    mut rx: mpsc::UnboundedReceiver<ProgressEvent>,
    mut sink: S,
) -> Result<usize, SinkError>
where
    S: ProgressSink,
{
    let mut delivered = 0;

    while let Some(event) = rx.recv().await {
        if let Err(e) = sink.send(&event).await {
            tracing::warn!("Progress sink failed on {} event: {}", event.kind(), e);
            return Err(e);
        }
        delivered += 1;
    }

    tracing::debug!("Progress channel closed after {} events", delivered);
    Ok(delivered)
}
