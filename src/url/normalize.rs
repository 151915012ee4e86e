use crate::{UrlError, UrlResult};
use url::Url;

/// List of tracking query parameters removed by [`strip_tracking_params`]
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Resolves a raw `href` against the page it was found on
///
/// # Resolution Rules
///
/// 1. Relative (`post`, `../post`), root-relative (`/post`),
///    protocol-relative (`//host/post`) and absolute hrefs are resolved
///    against `base` following standard URL resolution
/// 2. The result must use the `http` or `https` scheme
/// 3. The result must have a non-empty host
/// 4. The fragment is dropped, so `page#a` and `page#b` are the same URL
///
/// The host is lowercased by the `url` crate during parsing; path and
/// query are kept as written.
///
/// # Arguments
///
/// * `raw_href` - The href attribute exactly as found in the page
/// * `base` - The URL of the page containing the link
///
/// # Returns
///
/// * `Ok(Url)` - Canonical absolute URL
/// * `Err(UrlError)` - The link cannot name a crawlable page; skip it
///
/// # Examples
///
/// ```
/// use mkt_crawler::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://a.test/blog/").unwrap();
/// let url = normalize("post1#comments", &base).unwrap();
/// assert_eq!(url.as_str(), "https://a.test/blog/post1");
///
/// assert!(normalize("mailto:someone@a.test", &base).is_err());
/// ```
pub fn normalize(raw_href: &str, base: &Url) -> UrlResult<Url> {
    let href = raw_href.trim();

    let url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    finish(url)
}

/// Parses an already-absolute URL (seed URLs) with the same rules as
/// [`normalize`]
pub fn normalize_absolute(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    finish(url)
}

fn finish(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    url.set_fragment(None);

    Ok(url)
}

/// Removes tracking query parameters and sorts the remaining ones
///
/// Leaves the URL untouched when it has no query. A query consisting only of
/// tracking parameters is removed entirely.
pub fn strip_tracking_params(url: &mut Url) {
    if url.query().is_none() {
        return;
    }

    let filtered_params = filter_and_sort_query_params(url);

    if filtered_params.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url.query_pairs_mut();
        serializer.clear();
        for (k, v) in &filtered_params {
            serializer.append_pair(k, v);
        }
    }
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
