//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier
//! - Dispatching fetches onto the bounded worker pool
//! - Running every discovered link through the dispatch pipeline
//! - Waiting for the completion barrier and handing back the results

use crate::classify::{Classifier, KeywordClassifier};
use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlStatistics, CrawlStats, MatchRecord, ResultAggregator};
use crate::state::{Admission, HostPermit, HostThrottle, LinkOutcome, SeenSet};
use crate::url::{
    extract_domain, normalize, normalize_absolute, strip_tracking_params, DomainFilter, MatchMode,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, OwnedSemaphorePermit};
use tokio::task::JoinSet;
use tokio::time::Instant;
use url::Url;

/// Cooperative stop flag
///
/// Raising it stops new fetches from being dispatched and makes every link
/// looked at afterwards end as [`LinkOutcome::Cancelled`]. Fetches already in
/// flight run to completion.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<StopState>);

#[derive(Debug, Default)]
struct StopState {
    stopped: AtomicBool,
    wake: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.stopped.store(true, Ordering::SeqCst);
        self.0.wake.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.0.stopped.load(Ordering::SeqCst)
    }

    /// Resolves once the signal has been raised
    pub async fn stopped(&self) {
        let notified = self.0.wake.notified();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }
}

/// Everything the fetch tasks share
///
/// The seen-set and the aggregator are the only mutable state; both lock
/// internally and never across an await.
struct CrawlContext {
    fetcher: Arc<dyn Fetcher>,
    classifier: Arc<dyn Classifier>,
    filter: DomainFilter,
    seen: SeenSet,
    results: ResultAggregator,
    stats: CrawlStats,
    throttle: Arc<HostThrottle>,
    strip_tracking: bool,
    stop: StopSignal,
}

impl CrawlContext {
    /// Runs one discovered link through the dispatch pipeline
    ///
    /// normalize → dedup gate → domain gate → classify → record/enqueue.
    /// Each link ends in exactly one [`LinkOutcome`], which is counted here.
    ///
    /// # Returns
    ///
    /// The outcome, plus the URL to add to the frontier if it was enqueued
    fn dispatch(&self, raw_href: &str, page: &Url) -> (LinkOutcome, Option<Url>) {
        let (outcome, next) = self.evaluate(raw_href, page);
        self.stats.record_outcome(outcome);
        (outcome, next)
    }

    fn evaluate(&self, raw_href: &str, page: &Url) -> (LinkOutcome, Option<Url>) {
        if self.stop.is_stopped() {
            return (LinkOutcome::Cancelled, None);
        }

        let mut url = match normalize(raw_href, page) {
            Ok(url) => url,
            Err(_) => return (LinkOutcome::RejectedParse, None),
        };
        if self.strip_tracking {
            strip_tracking_params(&mut url);
        }

        if !self.seen.try_mark(&url) {
            return (LinkOutcome::RejectedDuplicate, None);
        }

        if !self.filter.allows(&url) {
            tracing::debug!("Out of scope: {}", url);
            return (LinkOutcome::RejectedOutOfScope, None);
        }

        let classification = self.classifier.classify(&url);
        if classification.relevant {
            let source_host = page.host_str().unwrap_or_default();
            self.results
                .record(MatchRecord::new(url.as_str(), source_host, page.as_str()));
            tracing::debug!("Marketing URL: {} (found on {})", url, page);
        }

        let outcome = LinkOutcome::classified(classification.relevant, classification.traversable);
        let next = classification.traversable.then_some(url);
        (outcome, next)
    }
}

/// What one fetch task hands back to the coordinator loop
struct PageOutcome {
    fetched: bool,
    enqueued: Vec<Url>,
}

impl PageOutcome {
    fn empty() -> Self {
        Self {
            fetched: false,
            enqueued: Vec::new(),
        }
    }
}

/// Result of a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Every match, in discovery order
    pub records: Vec<MatchRecord>,

    pub statistics: CrawlStatistics,
}

impl CrawlOutcome {
    pub fn was_cancelled(&self) -> bool {
        self.statistics.cancelled
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
    scheduler: Scheduler,
    seeds: Vec<String>,
}

impl Coordinator {
    /// Creates a coordinator using the keyword classifier from `config`
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `fetcher` - The transport pages are fetched with
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MktError::Config)` - The keyword set does not compile
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> crate::Result<Self> {
        let classifier = KeywordClassifier::from_config(&config.classifier)?;
        Ok(Self::with_classifier(config, fetcher, Arc::new(classifier)))
    }

    /// Creates a coordinator with a custom relevance strategy
    pub fn with_classifier(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        let mode = if config.crawler.strict_domain_matching {
            MatchMode::Suffix
        } else {
            MatchMode::Substring
        };
        let scheduler = Scheduler::new(&config.crawler);

        let ctx = CrawlContext {
            fetcher,
            classifier,
            filter: DomainFilter::new(&config.domains.allowed, mode),
            seen: SeenSet::new(),
            results: ResultAggregator::new(),
            stats: CrawlStats::new(),
            throttle: scheduler.throttle(),
            strip_tracking: config.crawler.strip_tracking_params,
            stop: StopSignal::new(),
        };

        Self {
            ctx: Arc::new(ctx),
            scheduler,
            seeds: config.domains.seeds.clone(),
        }
    }

    /// Handle for stopping the crawl from another task
    pub fn stop_signal(&self) -> StopSignal {
        self.ctx.stop.clone()
    }

    /// Runs the crawl until the completion barrier
    ///
    /// The loop:
    /// 1. Marks the seeds as seen and queues them
    /// 2. Hands frontier URLs whose host is ready to free workers, one
    ///    fetch task each
    /// 3. Collects finished tasks and queues the URLs they enqueued, or
    ///    wakes up when the next paced host becomes ready
    /// 4. Ends once the frontier is empty and no fetch is in flight
    ///
    /// Only then is the result collection read, so it is complete.
    pub async fn run(mut self) -> CrawlOutcome {
        let start_time = Instant::now();
        self.seed_frontier();

        tracing::info!(
            "Starting crawl with {} seeds, {} workers",
            self.scheduler.len(),
            self.scheduler.pool_size()
        );

        let mut in_flight: JoinSet<PageOutcome> = JoinSet::new();
        let mut pages_completed: u64 = 0;

        loop {
            let next_ready = self.dispatch_ready(&mut in_flight);

            if in_flight.is_empty() {
                // Nothing running: either done, or every queued host is paced
                let Some(ready_at) = next_ready else {
                    break;
                };
                tokio::select! {
                    _ = tokio::time::sleep_until(ready_at) => {}
                    _ = self.ctx.stop.stopped() => {}
                }
                continue;
            }

            let joined = match next_ready {
                Some(ready_at) => tokio::select! {
                    joined = in_flight.join_next() => joined,
                    _ = tokio::time::sleep_until(ready_at) => continue,
                },
                None => in_flight.join_next().await,
            };
            let Some(joined) = joined else {
                continue;
            };

            match joined {
                Ok(page) => {
                    self.scheduler.extend(page.enqueued);
                    if page.fetched {
                        pages_completed += 1;
                        if pages_completed % 10 == 0 {
                            self.log_progress(pages_completed, in_flight.len(), start_time);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                }
            }
        }

        let cancelled = self.ctx.stop.is_stopped();
        if cancelled {
            let abandoned = self.scheduler.clear();
            tracing::info!("Crawl stopped; {} queued URLs were not fetched", abandoned);
        }

        let records = self.ctx.results.snapshot();
        tracing::info!(
            "Crawl finished in {:?}: {} pages fetched, {} marketing URLs found",
            start_time.elapsed(),
            self.ctx.stats.pages_fetched(),
            records.len()
        );

        CrawlOutcome {
            records,
            statistics: self.ctx.stats.summary(start_time.elapsed(), cancelled),
        }
    }

    fn seed_frontier(&mut self) {
        for seed in &self.seeds {
            let url = match normalize_absolute(seed) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed, e);
                    continue;
                }
            };
            if self.ctx.seen.try_mark(&url) {
                self.scheduler.push(url);
            } else {
                tracing::debug!("Duplicate seed {}", url);
            }
        }
    }

    /// Spawns fetch tasks for queued URLs whose host is ready
    ///
    /// Never waits. URLs of a host that is busy or still in its delay stay
    /// queued in order while other hosts are served, so one host's pacing
    /// never holds a worker. URLs of a host past its request cap are dropped.
    ///
    /// # Returns
    ///
    /// The earliest instant a paced host becomes ready, if any URL is
    /// waiting on pacing
    fn dispatch_ready(&mut self, in_flight: &mut JoinSet<PageOutcome>) -> Option<Instant> {
        if self.ctx.stop.is_stopped() {
            return None;
        }

        let mut waiting = Vec::new();
        let mut blocked_hosts = HashSet::new();
        let mut next_ready: Option<Instant> = None;

        while let Some(url) = self.scheduler.pop() {
            let host = extract_domain(&url).unwrap_or_default();
            if blocked_hosts.contains(&host) {
                waiting.push(url);
                continue;
            }

            let Some(worker) = self.scheduler.try_acquire_worker() else {
                waiting.push(url);
                break;
            };

            match self.ctx.throttle.try_acquire(&host) {
                Admission::Ready(host_permit) => {
                    in_flight.spawn(process_url(
                        Arc::clone(&self.ctx),
                        url,
                        worker,
                        host_permit,
                    ));
                }
                Admission::Paced(ready_at) => {
                    next_ready = Some(next_ready.map_or(ready_at, |t| t.min(ready_at)));
                    blocked_hosts.insert(host);
                    waiting.push(url);
                }
                Admission::Busy => {
                    blocked_hosts.insert(host);
                    waiting.push(url);
                }
                Admission::Capped => {
                    tracing::debug!("Request cap reached for {}, skipping {}", host, url);
                    self.ctx.stats.record_host_limit_skip();
                }
            }
        }

        self.scheduler.requeue(waiting);
        next_ready
    }

    fn log_progress(&self, pages: u64, in_flight: usize, start_time: Instant) {
        let elapsed = start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            pages as f64 / elapsed
        } else {
            0.0
        };
        tracing::info!(
            "Progress: {} pages fetched, {} in frontier, {} in flight, {} matches, {:.2} pages/sec",
            pages,
            self.scheduler.len(),
            in_flight,
            self.ctx.results.len(),
            rate
        );
    }
}

/// Fetches one URL and dispatches every link on the page
///
/// Holds a worker permit and a host permit for its whole lifetime. A fetch
/// failure is logged and counted and leaves the seen-set and results
/// untouched.
async fn process_url(
    ctx: Arc<CrawlContext>,
    url: Url,
    _worker: OwnedSemaphorePermit,
    _host: HostPermit,
) -> PageOutcome {
    if ctx.stop.is_stopped() {
        return PageOutcome::empty();
    }

    tracing::info!("Visiting: {}", url);

    let page = match ctx.fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Error when visiting {}: {}", url, e);
            ctx.stats.record_fetch_failure();
            return PageOutcome::empty();
        }
    };
    ctx.stats.record_fetch();

    // After a redirect the landing page is visited too; links back to it
    // are duplicates
    if page.final_url != url {
        ctx.seen.try_mark(&page.final_url);
    }

    let parsed = parse_html(&page.body);
    tracing::debug!(
        "Fetched {} ({} links, title: {:?})",
        page.final_url,
        parsed.hrefs.len(),
        parsed.title
    );

    let enqueued = parsed
        .hrefs
        .iter()
        .filter_map(|href| ctx.dispatch(href, &page.final_url).1)
        .collect();

    PageOutcome {
        fetched: true,
        enqueued,
    }
}

/// Runs a complete crawl over HTTP
///
/// Use [`Coordinator`] directly to keep a [`StopSignal`] for the run.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use mkt_crawler::config::Config;
/// use mkt_crawler::crawler::run_crawl;
///
/// let outcome = run_crawl(&Config::default()).await?;
/// println!("{} marketing URLs", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> crate::Result<CrawlOutcome> {
    let fetcher = HttpFetcher::from_config(config)?;
    let coordinator = Coordinator::new(config, Arc::new(fetcher))?;
    Ok(coordinator.run().await)
}
