//! HTML parser for extracting links and metadata
//!
//! Links are returned exactly as written in the markup, surrounding
//! whitespace aside. Resolving them against the page URL is the
//! normalizer's job, so every `<a href>` reaches the dispatcher and ends in
//! a counted outcome: unusable hrefs as parse rejections, and empty or
//! same-page `#fragment` hrefs as duplicates of the page itself.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Trimmed `href` values of every `<a href>` on the page, in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts the page title and raw link targets
///
/// # Link Extraction Rules
///
/// Every `<a href="...">` is taken regardless of `rel` or `download`
/// attributes, including empty and `#section` hrefs.
///
/// # Example
///
/// ```
/// use mkt_crawler::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        assert_eq!(parse_html(html).title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        assert_eq!(parse_html(html).title, None);
    }

    #[test]
    fn test_hrefs_are_not_resolved() {
        let html = r#"
            <html>
            <body>
                <a href="/blog/post1">Post</a>
                <a href="other">Relative</a>
                <a href="//cdn.a.test/x">Protocol-relative</a>
                <a href="https://other.test/marketing">Absolute</a>
            </body>
            </html>
        "#;
        assert_eq!(
            parse_html(html).hrefs,
            vec![
                "/blog/post1",
                "other",
                "//cdn.a.test/x",
                "https://other.test/marketing"
            ]
        );
    }

    #[test]
    fn test_non_http_schemes_are_kept_for_the_normalizer() {
        let html = r#"<html><body>
            <a href="mailto:test@example.com">Email</a>
            <a href="javascript:void(0)">Js</a>
        </body></html>"#;
        assert_eq!(parse_html(html).hrefs.len(), 2);
    }

    #[test]
    fn test_fragment_only_and_empty_hrefs_are_kept() {
        let html = r##"<html><body>
            <a href="#section">Jump</a>
            <a href="   ">Blank</a>
            <a href="/page#section">Other page</a>
        </body></html>"##;
        assert_eq!(parse_html(html).hrefs, vec!["#section", "", "/page#section"]);
    }

    #[test]
    fn test_download_and_nofollow_links_are_followed() {
        let html = r#"<html><body>
            <a href="/file.pdf" download>Download</a>
            <a href="/page" rel="nofollow">Link</a>
        </body></html>"#;
        assert_eq!(parse_html(html).hrefs, vec!["/file.pdf", "/page"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a><link rel="canonical" href="/c"></body></html>"#;
        assert!(parse_html(html).hrefs.is_empty());
    }

    #[test]
    fn test_malformed_html_still_yields_links() {
        let html = r#"<div><a href="/one">one<a href="/two">two</div"#;
        assert_eq!(parse_html(html).hrefs, vec!["/one", "/two"]);
    }
}
