use crate::error::EmptyFrontier;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Pending and visited URLs of one crawl.
///
/// A URL is never both queued and visited, and is queued at most once.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<Url>,
    visited: HashSet<Url>,
    fetched: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless it was already visited or queued.
    ///
    /// Returns whether the URL was added.
    pub fn offer(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            ::log::trace!("Skipping already visited or queued link: {}", url);
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes the earliest offered URL still pending
    pub fn next(&mut self) -> Result<Url, EmptyFrontier> {
        let url = self.queue.pop_front().ok_or(EmptyFrontier)?;
        self.queued.remove(&url);
        Ok(url)
    }

    /// Records a fetch attempt for `url`
    pub fn mark_visited(&mut self, url: &Url) {
        self.forget_queued(url);
        if self.visited.insert(url.clone()) {
            self.fetched += 1;
        }
    }

    /// Records `url` as visited without counting a fetch, e.g. a redirect target
    pub fn mark_alias(&mut self, url: &Url) {
        self.forget_queued(url);
        self.visited.insert(url.clone());
    }

    fn forget_queued(&mut self, url: &Url) {
        if self.queued.remove(url) {
            self.queue.retain(|u| u != url);
        }
    }

    /// Number of URLs marked visited through [`Frontier::mark_visited`]
    pub fn count(&self) -> usize {
        self.fetched
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
