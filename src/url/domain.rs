use url::Url;

/// Returns the lowercased host of a URL, without port
///
/// This is the key the per-host throttle paces and caps requests by, so
/// `A.Test:8080` and `a.test` share one delay. `None` for URLs without a
/// host, such as `mailto:` links.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use mkt_crawler::url::extract_domain;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}
