use serde::Deserialize;

/// Main configuration structure for mkt-crawler
///
/// Every section may be omitted, in which case the built-in marketing crawl
/// defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub domains: DomainsConfig,
    #[serde(default)]
    pub notify: Option<NotifyConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Size of the global worker pool (maximum fetches in flight)
    pub workers: u32,

    /// Maximum number of concurrent fetches against a single host
    pub per_host_parallelism: u32,

    /// Minimum time between requests to the same host (milliseconds)
    pub per_host_delay_ms: u64,

    /// Maximum number of requests per host, 0 disables the cap
    pub max_host_requests: u32,

    /// Match allowed domains as host suffixes instead of substrings
    pub strict_domain_matching: bool,

    /// Drop utm_* and similar tracking parameters while normalizing
    pub strip_tracking_params: bool,

    /// Timeout for a single page fetch (seconds)
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            per_host_parallelism: 10,
            per_host_delay_ms: 10_000,
            max_host_requests: 0,
            strict_domain_matching: false,
            strip_tracking_params: false,
            request_timeout_secs: 30,
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                    (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36"
                .to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON results file
    #[serde(rename = "results-path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "marketing_urls.json".to_string(),
        }
    }
}

/// Relevance classification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ClassifierConfig {
    /// Keywords combined into one case-insensitive alternation
    pub keywords: Vec<String>,

    /// Extensions that prevent a keyword match from being recorded
    pub record_exclusions: Vec<String>,

    /// Extensions that are never queued for fetching
    pub traversal_exclusions: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: to_strings(&[
                "marketing",
                "blog",
                "content",
                "digital",
                "seo",
                "sem",
                "social",
                "inbound",
                "outbound",
                "growth",
                "strategy",
                "conversion",
                "branding",
            ]),
            record_exclusions: to_strings(&[".pdf", ".zip", ".doc"]),
            traversal_exclusions: to_strings(&[".css", ".js", ".png", ".jpg", ".gif"]),
        }
    }
}

/// Seed URLs and the allow-list bounding the crawl
#[derive(Debug, Clone, Deserialize)]
pub struct DomainsConfig {
    pub seeds: Vec<String>,
    pub allowed: Vec<String>,
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            seeds: to_strings(&[
                "https://neilpatel.com/blog/",
                "https://moz.com/blog",
                "https://www.hubspot.com/marketing",
                "https://blog.rockcontent.com/br/",
                "https://www.searchenginejournal.com/",
                "https://contentmarketinginstitute.com/",
                "https://adespresso.com/blog/",
                "https://blog.hootsuite.com/",
                "https://blog.rdstation.com/",
                "https://resultadosdigitais.com.br/blog/",
                "https://www.semrush.com/blog/",
                "https://marketingdeconteudo.com/",
                "https://klickpages.com.br/blog/",
                "https://www.vtex.com/pt-br/blog/",
                "https://ecommercenapratica.com/blog/",
                "https://shopify.com.br/blog/",
                "https://marketing.substack.com/",
                "https://growthhackers.com/blog/",
                "https://www.martechalliance.com/blog",
                "https://blog.agenciaeplus.com.br/",
                "https://www.mktdigital.com.br/blog/",
                "https://www.ecommercebrasil.com.br/artigos/",
                "https://ecommercefluente.com.br/",
                "https://mundodomarketing.com.br/",
                "https://sebrae.com.br/sites/PortalSebrae/cursosonline/como-fazer-marketing-digital-para-sua-empresa,2a9fe47f1c070410VgnVCM1000004c00210aRCRD",
                "https://www.hostgator.com.br/blog/marketing-digital/",
                "https://digitalhouse.com/br/blog/marketing-digital/",
                "https://www.alura.com.br/artigos/marketing-digital",
                "https://www.ecommerce.org.br/artigos",
                "https://conradoadolpho.com/blog/",
            ]),
            allowed: to_strings(&[
                "neilpatel.com",
                "moz.com",
                "hubspot.com",
                "blog.rockcontent.com",
                "searchenginejournal.com",
                "contentmarketinginstitute.com",
                "adespresso.com",
                "blog.hootsuite.com",
                "blog.rdstation.com",
                "resultadosdigitais.com.br",
                "semrush.com",
                "marketingdeconteudo.com",
                "klickpages.com.br",
                "vtex.com",
                "ecommercenapratica.com",
                "shopify.com.br",
                "marketing.substack.com",
                "growthhackers.com",
                "martechalliance.com",
                "blog.agenciaeplus.com.br",
                "mktdigital.com.br",
                "ecommercebrasil.com.br",
                "ecommercefluente.com.br",
                "mundodomarketing.com.br",
                "sebrae.com.br",
                "hostgator.com.br",
                "digitalhouse.com",
                "alura.com.br",
                "ecommerce.org.br",
                "conradoadolpho.com",
            ]),
        }
    }
}

/// Delivery settings for the end-of-run report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NotifyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Webhook endpoint receiving the report as JSON
    #[serde(default)]
    pub endpoint: String,

    /// Addresses the report is meant for
    #[serde(default)]
    pub recipients: Vec<String>,

    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_true() -> bool {
    true
}

fn default_subject() -> String {
    "Crawling Logs".to_string()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
