use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Thread-safe set of every absolute URL the crawl has already processed
///
/// The set only grows. Membership check and insertion happen under one lock
/// acquisition, so among any number of concurrent callers marking the same
/// URL exactly one observes the absent-to-present transition.
#[derive(Debug, Default)]
pub struct SeenSet {
    urls: Mutex<HashSet<String>>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as seen
    ///
    /// # Returns
    ///
    /// * `true` - This caller is the first to see the URL
    /// * `false` - The URL was already marked
    ///
    /// # Example
    ///
    /// ```
    /// use mkt_crawler::state::SeenSet;
    /// use url::Url;
    ///
    /// let seen = SeenSet::new();
    /// let url = Url::parse("https://a.test/blog/post1").unwrap();
    /// assert!(seen.try_mark(&url));
    /// assert!(!seen.try_mark(&url));
    /// ```
    pub fn try_mark(&self, url: &Url) -> bool {
        self.try_mark_str(url.as_str())
    }

    /// Same as [`SeenSet::try_mark`] for an already-serialized URL
    pub fn try_mark_str(&self, url: &str) -> bool {
        // Insert-only data stays consistent even if a holder panicked
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        let urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
