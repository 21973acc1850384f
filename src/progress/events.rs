use crate::crawler::PageResult;
use serde::{Deserialize, Serialize};

/// A structured message from the orchestrator to the caller
///
/// Serialized with a `type` tag, e.g.
/// `{"type":"progress","current":3,"total":10,"last_scraped":"Home"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Emitted once per dispatched batch
    Status { message: String },

    /// Emitted once per completed page
    Progress {
        /// Pages processed so far
        current: usize,
        /// The configured page budget, a ceiling rather than a discovered total
        total: usize,
        /// Title of the page just processed
        last_scraped: String,
    },

    /// Terminal: the full crawl result
    Complete { data: Vec<PageResult> },

    /// Terminal: the job could not start or was aborted
    Error { message: String },
}

impl ProgressEvent {
    pub fn status(message: impl Into<String>) -> Self {
        Self::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns true for events that end a job's event stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// The wire `type` tag of this event
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Progress { .. } => "progress",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
        }
    }
}
