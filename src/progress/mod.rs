//! Progress reporting
//!
//! This module handles:
//! - The progress/result event protocol
//! - The channel between the orchestrator and the reporting task
//! - Sinks that deliver events to a caller

mod events;
mod reporter;
mod sinks;

pub use events::ProgressEvent;
pub use reporter::{forward, ProgressReporter, ReporterClosed};
pub use sinks::{JsonLinesSink, LogSink, ProgressSink, SinkError};
