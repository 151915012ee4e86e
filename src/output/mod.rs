//! Output module for crawl results
//!
//! This module handles:
//! - Aggregating match records from concurrent workers
//! - Writing the final result snapshot to disk
//! - Recording crawl statistics for the end-of-run report

mod aggregator;
mod snapshot;
pub mod stats;

pub use aggregator::{MatchRecord, ResultAggregator};
pub use snapshot::{fallback_path, load_snapshot, persist};
pub use stats::{print_statistics, CrawlStatistics, CrawlStats};
