//! Progress sinks
//!
//! A sink is the transport end of the progress channel: whatever the caller
//! uses to receive events (a socket, stdout, a log).

use crate::progress::events::ProgressEvent;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Errors that can occur while delivering events
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink disconnected")]
    Disconnected,
}

/// Receives progress events, one at a time, in emission order
#[async_trait]
pub trait ProgressSink: Send {
    /// Delivers one event; an error ends delivery for the job
    async fn send(&mut self, event: &ProgressEvent) -> Result<(), SinkError>;
}

/// Writes each event as one line of JSON
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<tokio::io::Stdout> {
    /// A sink writing JSON lines to standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> ProgressSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, event: &ProgressEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Turns events into tracing records
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ProgressSink for LogSink {
    async fn send(&mut self, event: &ProgressEvent) -> Result<(), SinkError> {
        match event {
            ProgressEvent::Status { message } => tracing::info!("{}", message),
            ProgressEvent::Progress {
                current,
                total,
                last_scraped,
            } => tracing::info!("[{}/{}] {}", current, total, last_scraped),
            ProgressEvent::Complete { data } => {
                tracing::info!("Crawl complete: {} pages", data.len())
            }
            ProgressEvent::Error { message } => tracing::error!("{}", message),
        }
        Ok(())
    }
}
