use url::Url;

/// How an allow-list entry is compared against a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Host contains the entry anywhere (`notexample.com` matches `example.com`)
    #[default]
    Substring,
    /// Host equals the entry or is a subdomain of it
    Suffix,
}

/// Checks if a host matches a single allow-list entry
///
/// Both arguments are expected to be lowercase.
///
/// # Examples
///
/// ```
/// use mkt_crawler::url::{matches_entry, MatchMode};
///
/// assert!(matches_entry("example.com", "blog.example.com", MatchMode::Substring));
/// assert!(matches_entry("example.com", "notexample.com", MatchMode::Substring));
///
/// assert!(matches_entry("example.com", "blog.example.com", MatchMode::Suffix));
/// assert!(!matches_entry("example.com", "notexample.com", MatchMode::Suffix));
/// ```
pub fn matches_entry(entry: &str, host: &str, mode: MatchMode) -> bool {
    if entry.is_empty() || host.is_empty() {
        return false;
    }

    match mode {
        MatchMode::Substring => host.contains(entry),
        MatchMode::Suffix => host == entry || host.ends_with(&format!(".{}", entry)),
    }
}

/// Checks whether a URL's host belongs to the allow-list
///
/// Matching is case-insensitive substring containment, so subdomains are
/// admitted, and so is any unrelated host whose name happens to contain an
/// entry. Use [`DomainFilter`] with [`MatchMode::Suffix`] to tighten it.
///
/// # Examples
///
/// ```
/// use mkt_crawler::url::is_allowed;
/// use url::Url;
///
/// let url = Url::parse("https://blog.Example.com/x").unwrap();
/// assert!(is_allowed(&url, &["example.com".to_string()]));
/// ```
pub fn is_allowed(url: &Url, allow_list: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_lowercase();

    allow_list
        .iter()
        .any(|entry| matches_entry(&entry.to_lowercase(), &host, MatchMode::Substring))
}

/// The allow-list bounding crawl scope
///
/// Entries are lowercased once at construction; the filter is immutable and
/// shared read-only between workers.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    entries: Vec<String>,
    mode: MatchMode,
}

impl DomainFilter {
    pub fn new<I, S>(entries: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            mode,
        }
    }

    /// Returns true if the URL's host matches at least one entry
    pub fn allows(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.allows_host(host),
            None => false,
        }
    }

    /// Returns true if the host matches at least one entry
    pub fn allows_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.entries
            .iter()
            .any(|entry| matches_entry(entry, &host, self.mode))
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}
