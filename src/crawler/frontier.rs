//! Frontier and visited tracker
//!
//! The frontier is a FIFO queue of `(url, depth)` entries awaiting processing.
//! Every URL ever admitted is remembered, so a URL is enqueued at most once
//! for the lifetime of a job no matter how many pages link to it.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL awaiting processing, with its link-follow depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Breadth-first work queue with duplicate suppression
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `url` at `depth` unless it was admitted before
    ///
    /// # Returns
    ///
    /// `true` if the URL was newly enqueued
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes up to `n` entries in FIFO order
    pub fn pop_up_to(&mut self, n: usize) -> Vec<FrontierEntry> {
        let take = n.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of entries still queued
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Number of distinct URLs ever admitted
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
