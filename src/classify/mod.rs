//! Relevance classification for discovered links
//!
//! A classifier answers two independent questions about an absolute URL:
//! - should it be recorded as a marketing match
//! - should it be queued for further crawling
//!
//! Both are pure functions of the URL, so one classifier instance is shared
//! by every worker.

use crate::config::ClassifierConfig;
use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use url::Url;

/// Outcome of classifying a single URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Record the URL as a match
    pub relevant: bool,
    /// Queue the URL for fetching
    pub traversable: bool,
}

/// A swappable relevance strategy
///
/// The dispatcher only talks to this trait, so keyword sets or scoring
/// strategies can be replaced without touching crawl orchestration.
pub trait Classifier: Send + Sync {
    /// Returns true if the URL should be recorded as a match
    fn is_relevant(&self, url: &Url) -> bool;

    /// Returns true if the URL should be fetched and its links followed
    fn should_traverse(&self, url: &Url) -> bool;

    fn classify(&self, url: &Url) -> Classification {
        Classification {
            relevant: self.is_relevant(url),
            traversable: self.should_traverse(url),
        }
    }
}

/// Keyword alternation plus file-extension exclusions
///
/// Keywords and exclusions are both tested against the full URL string,
/// case-insensitively, with substring semantics. That means `.js` also
/// excludes `/app.json` and `/guide.jsp`, which matches how the exclusions
/// have always behaved.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    pattern: Option<Regex>,
    record_exclusions: Vec<String>,
    traversal_exclusions: Vec<String>,
}

impl KeywordClassifier {
    /// Builds a classifier from keyword and exclusion lists
    ///
    /// Keywords are regex-escaped, so `c++` or `a.b` match literally.
    pub fn new(
        keywords: &[String],
        record_exclusions: &[String],
        traversal_exclusions: &[String],
    ) -> Result<Self, ConfigError> {
        let alternation = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        // An empty keyword set matches nothing rather than everything
        let pattern = if alternation.is_empty() {
            None
        } else {
            let regex = RegexBuilder::new(&format!("({})", alternation))
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::Validation(format!("Invalid keyword pattern: {}", e)))?;
            Some(regex)
        };

        Ok(Self {
            pattern,
            record_exclusions: lowercase_all(record_exclusions),
            traversal_exclusions: lowercase_all(traversal_exclusions),
        })
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.keywords,
            &config.record_exclusions,
            &config.traversal_exclusions,
        )
    }

    /// Returns true if the URL string contains any keyword
    pub fn matches_keyword(&self, url: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(url))
    }
}

impl Classifier for KeywordClassifier {
    fn is_relevant(&self, url: &Url) -> bool {
        let url = url.as_str();
        self.matches_keyword(url) && !contains_any(url, &self.record_exclusions)
    }

    fn should_traverse(&self, url: &Url) -> bool {
        !contains_any(url.as_str(), &self.traversal_exclusions)
    }
}

fn contains_any(url: &str, needles: &[String]) -> bool {
    let url = url.to_lowercase();
    needles.iter().any(|n| url.contains(n.as_str()))
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn default_classifier() -> KeywordClassifier {
        KeywordClassifier::from_config(&ClassifierConfig::default()).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_match_is_relevant() {
        let classifier = default_classifier();
        let c = classifier.classify(&url("https://example.com/digital-marketing-guide"));
        assert!(c.relevant);
        assert!(c.traversable);
    }

    #[test]
    fn test_document_asset_not_relevant_even_with_keyword() {
        let classifier = default_classifier();
        assert!(!classifier.is_relevant(&url("https://example.com/marketing-plan.pdf")));
        assert!(!classifier.is_relevant(&url("https://example.com/blog/export.zip")));
        assert!(!classifier.is_relevant(&url("https://example.com/seo/guide.docx")));
    }

    #[test]
    fn test_document_asset_still_traversable() {
        // Document exclusions only affect recording
        let classifier = default_classifier();
        assert!(classifier.should_traverse(&url("https://a.test/about.pdf")));
    }

    #[test]
    fn test_static_assets_not_traversed() {
        let classifier = default_classifier();
        for asset in [
            "https://a.test/style.css",
            "https://a.test/app.js",
            "https://a.test/logo.png",
            "https://a.test/photo.jpg",
            "https://a.test/anim.gif",
        ] {
            assert!(!classifier.should_traverse(&url(asset)), "{}", asset);
        }
    }

    #[test]
    fn test_static_asset_with_keyword_is_recorded_but_not_traversed() {
        let classifier = default_classifier();
        let c = classifier.classify(&url("https://a.test/blog/hero.png"));
        assert!(c.relevant);
        assert!(!c.traversable);
    }

    #[test]
    fn test_case_insensitive_keywords_and_extensions() {
        let classifier = default_classifier();
        assert!(classifier.is_relevant(&url("https://a.test/SEO-Tips")));
        assert!(!classifier.is_relevant(&url("https://a.test/Marketing-Plan.PDF")));
        assert!(!classifier.should_traverse(&url("https://a.test/LOGO.PNG")));
    }

    #[test]
    fn test_no_keyword_not_relevant() {
        let classifier = default_classifier();
        let c = classifier.classify(&url("https://a.test/about-us"));
        assert!(!c.relevant);
        assert!(c.traversable);
    }

    #[test]
    fn test_keyword_in_host_counts() {
        let classifier = default_classifier();
        assert!(classifier.is_relevant(&url("https://blog.a.test/")));
    }

    #[test]
    fn test_custom_keywords_are_escaped() {
        let classifier =
            KeywordClassifier::new(&strings(&["c++", "a.b"]), &[], &[]).unwrap();
        assert!(classifier.matches_keyword("https://x.test/c++/intro"));
        assert!(classifier.matches_keyword("https://x.test/a.b"));
        assert!(!classifier.matches_keyword("https://x.test/axb"));
    }

    #[test]
    fn test_empty_keyword_set_matches_nothing() {
        let classifier = KeywordClassifier::new(&[], &[], &[]).unwrap();
        assert!(!classifier.is_relevant(&url("https://a.test/marketing")));
        assert!(classifier.should_traverse(&url("https://a.test/marketing")));
    }

    #[test]
    fn test_classifier_is_object_safe() {
        let classifier: Box<dyn Classifier> = Box::new(default_classifier());
        assert!(classifier.is_relevant(&url("https://a.test/growth")));
    }
}
