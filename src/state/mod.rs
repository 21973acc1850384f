//! State module for tracking crawl job progress
//!
//! # Components
//!
//! - `JobState`: lifecycle of a crawl job (idle, running, completed, aborted)

mod job_state;

pub use job_state::JobState;
