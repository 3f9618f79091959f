// src/crawl/queue.rs
// =============================================================================
// The crawl frontier: pages discovered but not fetched yet.
//
// How it works:
// - VecDeque keeps the order: push at the back, pop from the front, which
//   makes the crawl breadth-first
// - A HashSet mirrors the queue contents so "is this URL already waiting?"
//   is O(1) instead of a scan over the whole queue
// - A URL leaves the index when it is popped; from then on the visited set
//   in the engine is what stops it coming back
//
// Entries are absolute URLs exactly as resolved, fragment included.
// =============================================================================

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url` at the back unless the identical string is already queued.
    /// Returns true if it was added.
    pub fn push(&mut self, url: String) -> bool {
        if self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the oldest URL
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
