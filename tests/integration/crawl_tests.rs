//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from seed URL to the saved JSON file.

use mkt_crawler::config::{load_config, Config, CrawlerConfig, DomainsConfig};
use mkt_crawler::crawler::{crawl, run_crawl, Coordinator, HttpFetcher};
use mkt_crawler::output::{load_snapshot, persist};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server with no pacing
fn create_test_config(seeds: Vec<String>, allowed: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 4,
            per_host_delay_ms: 0,
            request_timeout_secs: 5,
            ..CrawlerConfig::default()
        },
        domains: DomainsConfig {
            seeds,
            allowed: vec![allowed.to_string()],
        },
        ..Config::default()
    }
}

fn host_of(server: &MockServer) -> String {
    url::Url::parse(&server.uri())
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string()
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_records_only_in_scope_matches() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let other_port = url::Url::parse(&other_server.uri())
        .unwrap()
        .port()
        .unwrap();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/blog/post1">Post</a>
               <a href="/about.pdf">About</a>
               <a href="http://localhost:{}/marketing">Elsewhere</a>"#,
            other_port
        ),
    )
    .await;
    mount_page(&mock_server, "/blog/post1", "No links here").await;
    Mock::given(method("GET"))
        .and(path("/about.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&mock_server)
        .await;

    // The out-of-scope host must never be contacted
    Mock::given(method("GET"))
        .respond_with(html(""))
        .expect(0)
        .mount(&other_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], &host_of(&mock_server));
    let outcome = crawl(config).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1, "Expected exactly one match");
    let record = &outcome.records[0];
    assert_eq!(record.url, format!("{}/blog/post1", base_url));
    assert_eq!(record.source_host, host_of(&mock_server));
    assert_eq!(record.found_on_page, format!("{}/", base_url));
    assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());

    // The PDF is crawled (it is not a static asset) but is not HTML
    assert_eq!(outcome.statistics.pages_fetched, 2);
    assert_eq!(outcome.statistics.fetch_failures, 1);
}

#[tokio::test]
async fn test_results_round_trip_through_snapshot() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/blog/a">a</a><a href="/seo/b">b</a><a href="/growth/c">c</a>"#,
    )
    .await;

    let config = create_test_config(vec![format!("{}/", base_url)], &host_of(&mock_server));
    let outcome = run_crawl(&config).await.expect("Crawl failed");
    assert_eq!(outcome.records.len(), 3);

    let dir = tempfile::TempDir::new().unwrap();
    let destination = dir.path().join("marketing_urls.json");
    persist(&outcome.records, &destination).expect("Failed to persist");

    let loaded = load_snapshot(&destination).expect("Failed to load snapshot");
    assert_eq!(loaded, outcome.records);

    let content = std::fs::read_to_string(&destination).unwrap();
    assert!(content.contains("\"foundOnPage\""));
    assert!(content.contains("\"sourceHost\""));
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/blog/"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/blog/", r#"<a href="post-a">A</a>"#).await;
    mount_page(&mock_server, "/blog/post-a", "").await;

    let config = create_test_config(vec![format!("{}/start", base_url)], &host_of(&mock_server));
    let outcome = crawl(config).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].url, format!("{}/blog/post-a", base_url));
    assert_eq!(outcome.records[0].found_on_page, format!("{}/blog/", base_url));
}

#[tokio::test]
async fn test_fetch_errors_do_not_stop_the_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/blog/broken">broken</a><a href="/blog/fine">fine</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/blog/fine", r#"<a href="/content/deep">deep</a>"#).await;
    // /content/deep is not mounted, so wiremock answers 404

    let config = create_test_config(vec![format!("{}/", base_url)], &host_of(&mock_server));
    let outcome = crawl(config).await.expect("Crawl failed");

    let urls: HashSet<_> = outcome.records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(urls.len(), 3);
    assert!(urls.contains(&format!("{}/content/deep", base_url)));
    assert_eq!(outcome.statistics.pages_fetched, 2);
    assert_eq!(outcome.statistics.fetch_failures, 2);
}

#[tokio::test]
async fn test_every_page_is_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let everything = r#"
        <a href="/">home</a>
        <a href="/blog/1">1</a>
        <a href="/blog/2">2</a>
        <a href="/blog/3">3</a>
        <a href="/blog/1#comments">1 again</a>
    "#;

    for page in ["/", "/blog/1", "/blog/2", "/blog/3"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(everything))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(vec![format!("{}/", base_url)], &host_of(&mock_server));
    let outcome = crawl(config).await.expect("Crawl failed");

    assert_eq!(outcome.records.len(), 3);
    let unique: HashSet<_> = outcome.records.iter().map(|r| &r.url).collect();
    assert_eq!(unique.len(), 3, "No URL may be recorded twice");
    // Mock expectations are verified when the server is dropped
}

#[tokio::test]
async fn test_per_host_delay_spaces_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_page(&mock_server, "/a", "").await;
    mount_page(&mock_server, "/b", "").await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], &host_of(&mock_server));
    config.crawler.per_host_delay_ms = 200;

    let start = Instant::now();
    let outcome = crawl(config).await.expect("Crawl failed");

    assert_eq!(outcome.statistics.pages_fetched, 3);
    assert!(
        start.elapsed() >= Duration::from_millis(400),
        "Three requests to one host need at least two delays, took {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_stop_signal_ends_crawl_early() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..20).map(|i| format!(r#"<a href="/p{i}">p</a>"#)).collect();
    mount_page(&mock_server, "/", &links).await;
    Mock::given(method("GET"))
        .respond_with(html("").set_delay(Duration::from_millis(50)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], &host_of(&mock_server));
    config.crawler.workers = 1;

    let fetcher = HttpFetcher::from_config(&config).unwrap();
    let coordinator = Coordinator::new(&config, Arc::new(fetcher)).unwrap();
    let stop = coordinator.stop_signal();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        stop.stop();
    });

    let outcome = coordinator.run().await;

    assert!(outcome.was_cancelled());
    assert!(outcome.statistics.pages_fetched < 21);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/news/a">a</a><a href="/branding-tips">b</a>"#,
    )
    .await;

    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("crawler.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawler]
workers = 2
per-host-delay-ms = 0

[classifier]
keywords = ["news"]

[domains]
seeds = ["{}/"]
allowed = ["{}"]
"#,
            base_url,
            host_of(&mock_server)
        ),
    )
    .unwrap();

    let config = load_config(&config_path).expect("Failed to load config");
    let outcome = crawl(config).await.expect("Crawl failed");

    let urls: Vec<_> = outcome.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/news/a", base_url)]);
}
