//! Crawl statistics
//!
//! Counters are updated lock-free by every worker and read once the crawl
//! has drained to produce the end-of-run report.

use crate::state::LinkOutcome;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    host_limit_skipped: AtomicU64,
    outcomes: [AtomicU64; 8],
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_host_limit_skip(&self) {
        self.host_limit_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts the terminal state of one discovered link
    pub fn record_outcome(&self, outcome: LinkOutcome) {
        self.outcomes[outcome_index(outcome)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn outcome_count(&self, outcome: LinkOutcome) -> u64 {
        self.outcomes[outcome_index(outcome)].load(Ordering::Relaxed)
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    /// Takes a consistent-enough copy for reporting
    pub fn summary(&self, elapsed: Duration, cancelled: bool) -> CrawlStatistics {
        let outcomes = LinkOutcome::all()
            .into_iter()
            .map(|o| (o, self.outcome_count(o)))
            .filter(|(_, count)| *count > 0)
            .collect::<Vec<_>>();

        CrawlStatistics {
            pages_fetched: self.pages_fetched(),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            host_limit_skipped: self.host_limit_skipped.load(Ordering::Relaxed),
            links_seen: outcomes.iter().map(|(_, c)| c).sum(),
            matches: outcomes
                .iter()
                .filter(|(o, _)| o.is_recorded())
                .map(|(_, c)| c)
                .sum(),
            outcomes,
            elapsed,
            cancelled,
        }
    }
}

fn outcome_index(outcome: LinkOutcome) -> usize {
    match outcome {
        LinkOutcome::RejectedParse => 0,
        LinkOutcome::RejectedDuplicate => 1,
        LinkOutcome::RejectedOutOfScope => 2,
        LinkOutcome::Ignored => 3,
        LinkOutcome::Recorded => 4,
        LinkOutcome::Enqueued => 5,
        LinkOutcome::RecordedAndEnqueued => 6,
        LinkOutcome::Cancelled => 7,
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Pages successfully fetched
    pub pages_fetched: u64,

    /// Fetches that failed (network, HTTP status, non-HTML)
    pub fetch_failures: u64,

    /// Frontier URLs dropped because their host hit the request cap
    pub host_limit_skipped: u64,

    /// Links taken off fetched pages
    pub links_seen: u64,

    /// Match records created
    pub matches: u64,

    /// Non-zero link outcome counts
    pub outcomes: Vec<(LinkOutcome, u64)>,

    pub elapsed: Duration,

    /// The run stopped early on request
    pub cancelled: bool,
}

impl CrawlStatistics {
    /// Renders the statistics as a plain-text report
    pub fn render(&self) -> String {
        let mut out = String::new();
        let status = if self.cancelled { "cancelled" } else { "completed" };

        let _ = writeln!(out, "=== Crawl Statistics ===\n");
        let _ = writeln!(out, "Overview:");
        let _ = writeln!(out, "  Status: {}", status);
        let _ = writeln!(out, "  Duration: {:.1}s", self.elapsed.as_secs_f64());
        let _ = writeln!(out, "  Pages fetched: {}", self.pages_fetched);
        let _ = writeln!(out, "  Fetch failures: {}", self.fetch_failures);
        if self.host_limit_skipped > 0 {
            let _ = writeln!(out, "  Skipped (host cap): {}", self.host_limit_skipped);
        }
        let _ = writeln!(out, "  Links seen: {}", self.links_seen);
        let _ = writeln!(out, "  Marketing URLs found: {}", self.matches);
        let _ = writeln!(out);

        if !self.outcomes.is_empty() {
            let _ = writeln!(out, "Links by Outcome:");
            let mut sorted = self.outcomes.clone();
            sorted.sort_by(|a, b| b.1.cmp(&a.1));
            for (outcome, count) in sorted {
                let percentage = (count as f64 / self.links_seen.max(1) as f64) * 100.0;
                let _ = writeln!(out, "  {}: {} ({:.1}%)", outcome, count, percentage);
            }
        }

        out
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", stats.render());
}
