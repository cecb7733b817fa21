//! Seen-URL store for breadth-first crawling
//!
//! The seen set is the only crawl state that grows across rounds. Every
//! insertion goes through [`SeenSet::try_mark`], which checks and records a URL
//! under one lock so concurrent callers can never both claim the same URL.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Debug, Default)]
struct SeenInner {
    seen: HashSet<String>,
    /// Discovery order, used to materialize the final URL set
    order: Vec<String>,
}

/// Deduplicating store of normalized URLs
#[derive(Debug, Default)]
pub struct SeenSet {
    inner: Mutex<SeenInner>,
}

impl SeenSet {
    /// Creates an empty seen set
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a seen set with the crawl root already marked
    pub fn with_root(root: &Url) -> Self {
        let set = Self::new();
        set.try_mark(root.as_str());
        set
    }

    /// Records `url` if it has not been seen before
    ///
    /// Returns true exactly once per distinct URL, no matter how many callers
    /// race on it.
    pub fn try_mark(&self, url: &str) -> bool {
        let mut inner = self.lock();
        if inner.seen.contains(url) {
            return false;
        }

        inner.seen.insert(url.to_string());
        inner.order.push(url.to_string());
        true
    }

    /// Returns true if `url` has been marked
    pub fn contains(&self, url: &str) -> bool {
        self.lock().seen.contains(url)
    }

    /// Number of distinct URLs marked so far
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    /// Returns true if nothing has been marked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the set, returning URLs in the order they were first marked
    pub fn into_urls(self) -> Vec<String> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .order
    }

    // Poisoning is ignored: both collections are written together after the
    // membership check.
    fn lock(&self) -> MutexGuard<'_, SeenInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
