//! The crawl frontier: URLs known but not yet processed
//!
//! The frontier keeps pending URLs in FIFO order and remembers every URL
//! already processed. Deduplication is by canonical form, so two spellings of
//! the same page are never queued twice and a visited page is never queued
//! again.

use crate::url::canonicalize;
use std::collections::{HashSet, VecDeque};

/// A pending URL with its canonical key
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedUrl {
    /// The URL as it was discovered
    url: String,

    /// Canonical form used for deduplication
    key: String,
}

/// Ordered, deduplicated work queue plus visited set
///
/// Invariants:
/// - no two queued entries share a canonical form
/// - no queued entry is also visited
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every URL not already queued or visited
    ///
    /// Returns the number of URLs actually added.
    pub fn enqueue<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for url in urls {
            let url = url.into();
            let key = canonicalize(&url);
            if self.visited.contains(&key) || self.queued.contains(&key) {
                continue;
            }
            self.queued.insert(key.clone());
            self.queue.push_back(QueuedUrl { url, key });
            added += 1;
        }

        if added > 0 {
            tracing::debug!("Added {} new links to frontier", added);
        }
        added
    }

    /// Removes and returns the head of the queue
    pub fn dequeue_front(&mut self) -> Option<String> {
        let entry = self.queue.pop_front()?;
        self.queued.remove(&entry.key);
        Some(entry.url)
    }

    /// Removes and returns the first queued URL satisfying `predicate`
    ///
    /// Entries are scanned in FIFO order; entries before the match keep their
    /// positions.
    pub fn dequeue_matching<P>(&mut self, predicate: P) -> Option<String>
    where
        P: Fn(&str) -> bool,
    {
        let index = self.queue.iter().position(|entry| predicate(&entry.url))?;
        let entry = self.queue.remove(index)?;
        self.queued.remove(&entry.key);
        Some(entry.url)
    }

    /// Records a URL as processed and drops any queued entry for it
    pub fn mark_visited(&mut self, url: &str) {
        let key = canonicalize(url);
        if self.queued.remove(&key) {
            self.queue.retain(|entry| entry.key != key);
        }
        if self.visited.insert(key) {
            tracing::debug!("Marked as visited: {}", url);
        }
    }

    /// Returns up to `count` queued URLs from the head, in order
    pub fn peek(&self, count: usize) -> impl Iterator<Item = &str> {
        self.queue.iter().take(count).map(|entry| entry.url.as_str())
    }

    /// Returns true if the URL's canonical form is queued
    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(&canonicalize(url))
    }

    /// Returns true if the URL's canonical form has been visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&canonicalize(url))
    }

    /// Canonical forms of all queued URLs
    pub fn queued_keys(&self) -> &HashSet<String> {
        &self.queued
    }

    /// Canonical forms of all visited URLs
    pub fn visited_keys(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Number of queued URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Checks the frontier invariants
    ///
    /// True when the queue and its key set agree, no key is queued twice and
    /// no queued key is visited.
    pub fn is_consistent(&self) -> bool {
        let mut keys = HashSet::with_capacity(self.queue.len());
        let unique = self.queue.iter().all(|entry| keys.insert(entry.key.as_str()));
        unique
            && keys.len() == self.queued.len()
            && self.queued.iter().all(|key| keys.contains(key.as_str()))
            && self.queued.is_disjoint(&self.visited)
    }
}
