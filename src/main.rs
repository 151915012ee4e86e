//! mkt-crawler main entry point
//!
//! This is the command-line interface for the marketing content crawler.

use clap::Parser;
use mkt_crawler::config::{load_config_with_hash, validate, Config};
use mkt_crawler::crawler::{Coordinator, CrawlOutcome, HttpFetcher};
use mkt_crawler::notify::{build_report, notify_best_effort, WebhookNotifier};
use mkt_crawler::output::{fallback_path, persist, print_statistics};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// mkt-crawler: A focused crawler for marketing content
///
/// Crawls a fixed set of allow-listed marketing domains, records every link
/// whose URL matches a marketing keyword and saves the matches as JSON once
/// the crawl has finished.
#[derive(Parser, Debug)]
#[command(name = "mkt-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A focused crawler for marketing content", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write results here instead of the configured results path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(output) = &cli.output {
        config.output.results_path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mkt_crawler=info,warn"),
            1 => EnvFilter::new("mkt_crawler=debug,info"),
            2 => EnvFilter::new("mkt_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads and validates the configuration file, or the built-in defaults
fn load_configuration(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== mkt-crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!(
        "  Per-host parallelism: {}",
        config.crawler.per_host_parallelism
    );
    println!("  Per-host delay: {}ms", config.crawler.per_host_delay_ms);
    if config.crawler.max_host_requests > 0 {
        println!("  Max host requests: {}", config.crawler.max_host_requests);
    }
    println!(
        "  Domain matching: {}",
        if config.crawler.strict_domain_matching {
            "suffix"
        } else {
            "substring"
        }
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\nClassifier:");
    println!("  Keywords: {}", config.classifier.keywords.join(", "));
    println!(
        "  Not recorded: {}",
        config.classifier.record_exclusions.join(", ")
    );
    println!(
        "  Not crawled: {}",
        config.classifier.traversal_exclusions.join(", ")
    );

    println!("\nAllowed Domains ({}):", config.domains.allowed.len());
    for domain in &config.domains.allowed {
        println!("  - {}", domain);
    }

    println!("\nSeeds ({}):", config.domains.seeds.len());
    for seed in &config.domains.seeds {
        println!("  * {}", seed);
    }

    match &config.notify {
        Some(notify) if notify.enabled => {
            println!("\nNotification:");
            println!("  Endpoint: {}", notify.endpoint);
            println!("  Recipients: {}", notify.recipients.join(", "));
        }
        _ => println!("\nNotification: disabled"),
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.domains.seeds.len()
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Notification settings are checked before anything is fetched
    let notifier = match &config.notify {
        Some(notify) if notify.enabled => Some(WebhookNotifier::from_config(notify)?),
        _ => None,
    };

    let fetcher = HttpFetcher::from_config(&config)?;
    let coordinator = Coordinator::new(&config, Arc::new(fetcher))?;

    let stop = coordinator.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight requests");
            stop.stop();
        }
    });

    println!("Starting the Web Crawler for Marketing websites...");
    let outcome = coordinator.run().await;

    println!(
        "\nCrawling finished. It found {} URLs with marketing content.\n",
        outcome.records.len()
    );
    print_statistics(&outcome.statistics);

    let destination = PathBuf::from(&config.output.results_path);
    let saved = save_results(&outcome, &destination);

    if let (Some(notifier), Some(notify)) = (&notifier, &config.notify) {
        let saved_path = saved.as_ref().ok().map(PathBuf::as_path);
        let report = build_report(notify, &outcome.statistics, saved_path);
        notify_best_effort(notifier, &report).await;
    }

    let saved_path = saved?;
    println!("URLs saved in {} file.", saved_path.display());
    Ok(())
}

/// Persists the results, retrying once at a timestamped fallback path
///
/// # Returns
///
/// The path the results were written to, or the error of the retry
fn save_results(
    outcome: &CrawlOutcome,
    destination: &Path,
) -> Result<PathBuf, mkt_crawler::MktError> {
    match persist(&outcome.records, destination) {
        Ok(()) => Ok(destination.to_path_buf()),
        Err(e) => {
            tracing::error!("{}", e);
            let fallback = fallback_path(destination);
            tracing::warn!("Retrying at {}", fallback.display());
            persist(&outcome.records, &fallback).map_err(|retry| {
                tracing::error!("{}", retry);
                retry
            })?;
            Ok(fallback)
        }
    }
}
