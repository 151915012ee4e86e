//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction
//! - The frontier and bounded worker pool
//! - Overall crawl coordination and link dispatch

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, StopSignal};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::Scheduler;

use crate::config::Config;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier from the configured seed URLs
/// 3. Fetch pages and dispatch the links they contain
/// 4. Wait until every queued URL has been processed
/// 5. Return the match records and crawl statistics
///
/// Nothing is written to disk; see [`crate::output::persist`].
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed
/// * `Err(MktError)` - The HTTP client or classifier could not be built
pub async fn crawl(config: Config) -> crate::Result<CrawlOutcome> {
    run_crawl(&config).await
}
