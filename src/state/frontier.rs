use std::collections::{HashSet, VecDeque};

/// Breadth-first frontier for a single crawl
///
/// Holds the FIFO queue of URLs still to fetch together with the set of URLs
/// already dequeued. A URL is queued at most once over the lifetime of the
/// frontier: `push` refuses anything already waiting or already processed.
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, oldest first
    queue: VecDeque<String>,

    /// Mirror of `queue` for O(1) membership checks
    queued: HashSet<String>,

    /// Every URL that has been dequeued
    processed: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn with_seed(seed: impl Into<String>) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Appends a URL to the back of the queue
    ///
    /// Returns `false` without queueing when the URL is already waiting or
    /// has already been processed.
    pub fn push(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.queued.contains(&url) || self.processed.contains(&url) {
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Pops the oldest URL and marks it processed
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        self.processed.insert(url.clone());
        Some(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn is_processed(&self, url: &str) -> bool {
        self.processed.contains(url)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}
