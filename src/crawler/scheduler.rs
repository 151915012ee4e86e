//! Scheduler for managing the crawl frontier and worker pool
//!
//! This module handles:
//! - The FIFO frontier of URLs waiting to be fetched
//! - Global concurrency limiting via a semaphore
//! - Handing out the shared per-host throttle

use crate::config::CrawlerConfig;
use crate::state::{HostThrottle, ThrottleConfig};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};
use url::Url;

/// Scheduler owns the frontier and the global worker pool
///
/// The scheduler coordinates:
/// - Global concurrency limits (at most `workers` fetches in flight)
/// - Per-host parallelism and pacing, through [`HostThrottle`]
/// - Discovery-order selection from the frontier
///
/// The frontier is owned by the coordinator loop alone and needs no lock.
/// Worker permits are moved into each fetch task and released when it ends.
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    workers: Arc<Semaphore>,

    /// Pool size the semaphore was created with
    pool_size: usize,

    /// Per-host throttle shared with the fetch tasks
    throttle: Arc<HostThrottle>,

    /// URLs waiting to be fetched, oldest first
    frontier: VecDeque<Url>,
}

impl Scheduler {
    /// Creates a new scheduler with an empty frontier
    pub fn new(config: &CrawlerConfig) -> Self {
        let pool_size = config.workers.max(1) as usize;

        Self {
            workers: Arc::new(Semaphore::new(pool_size)),
            pool_size,
            throttle: Arc::new(HostThrottle::new(ThrottleConfig::from(config))),
            frontier: VecDeque::new(),
        }
    }

    /// Adds a URL to the back of the frontier
    pub fn push(&mut self, url: Url) {
        self.frontier.push_back(url);
    }

    /// Puts URLs that could not be dispatched back at the front, keeping
    /// their order
    pub fn requeue(&mut self, urls: Vec<Url>) {
        for url in urls.into_iter().rev() {
            self.frontier.push_front(url);
        }
    }

    pub fn extend<I: IntoIterator<Item = Url>>(&mut self, urls: I) {
        self.frontier.extend(urls);
    }

    /// Takes the oldest queued URL
    pub fn pop(&mut self) -> Option<Url> {
        self.frontier.pop_front()
    }

    /// Number of URLs waiting
    pub fn len(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Drops everything still queued, returning how many URLs were abandoned
    pub fn clear(&mut self) -> usize {
        let abandoned = self.frontier.len();
        self.frontier.clear();
        abandoned
    }

    /// Takes a free worker if there is one, without waiting
    pub fn try_acquire_worker(&self) -> Option<OwnedSemaphorePermit> {
        match Arc::clone(&self.workers).try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(TryAcquireError::NoPermits) | Err(TryAcquireError::Closed) => None,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn throttle(&self) -> Arc<HostThrottle> {
        Arc::clone(&self.throttle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(workers: u32) -> CrawlerConfig {
        CrawlerConfig {
            workers,
            per_host_delay_ms: 0,
            ..CrawlerConfig::default()
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_frontier_is_fifo() {
        let mut scheduler = Scheduler::new(&config(2));
        scheduler.push(url("https://a.test/1"));
        scheduler.extend([url("https://a.test/2"), url("https://b.test/3")]);

        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.pop().unwrap().as_str(), "https://a.test/1");
        assert_eq!(scheduler.pop().unwrap().as_str(), "https://a.test/2");
        assert_eq!(scheduler.pop().unwrap().as_str(), "https://b.test/3");
        assert!(scheduler.pop().is_none());
    }

    #[test]
    fn test_requeue_and_clear() {
        let mut scheduler = Scheduler::new(&config(1));
        scheduler.push(url("https://a.test/3"));
        scheduler.requeue(vec![url("https://a.test/1"), url("https://a.test/2")]);

        assert_eq!(scheduler.pop().unwrap().path(), "/1");
        assert_eq!(scheduler.pop().unwrap().path(), "/2");
        scheduler.push(url("https://a.test/4"));
        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_worker_pool_is_bounded() {
        let scheduler = Scheduler::new(&config(2));
        assert_eq!(scheduler.pool_size(), 2);

        let first = scheduler.try_acquire_worker().unwrap();
        let second = scheduler.try_acquire_worker().unwrap();
        assert!(scheduler.try_acquire_worker().is_none());

        drop(first);
        assert!(scheduler.try_acquire_worker().is_some());
        drop(second);
    }

    #[test]
    fn test_zero_workers_still_makes_progress() {
        let scheduler = Scheduler::new(&config(0));
        assert_eq!(scheduler.pool_size(), 1);
        assert!(scheduler.try_acquire_worker().is_some());
    }

    #[test]
    fn test_throttle_is_shared() {
        let scheduler = Scheduler::new(&config(4));
        let a = scheduler.throttle();
        let b = scheduler.throttle();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
