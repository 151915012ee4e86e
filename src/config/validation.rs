use crate::classify::KeywordClassifier;
use crate::config::types::{ClassifierConfig, Config, CrawlerConfig, DomainsConfig, NotifyConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent(&config.user_agent.value)?;
    validate_output_path(&config.output.results_path)?;
    validate_classifier_config(&config.classifier)?;
    validate_domains(&config.domains)?;
    if let Some(notify) = &config.notify {
        validate_notify_config(notify)?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.workers < 1 || config.workers > 256 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 256, got {}",
            config.workers
        )));
    }

    if config.per_host_parallelism < 1 {
        return Err(ConfigError::Validation(format!(
            "per_host_parallelism must be >= 1, got {}",
            config.per_host_parallelism
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent(value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_path(path: &str) -> ConfigResult<()> {
    if path.is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates keyword and extension lists
fn validate_classifier_config(config: &ClassifierConfig) -> ConfigResult<()> {
    if config.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "keywords cannot contain empty entries".to_string(),
        ));
    }

    for ext in config
        .record_exclusions
        .iter()
        .chain(config.traversal_exclusions.iter())
    {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "Excluded extension '{}' must start with '.'",
                ext
            )));
        }
    }

    // Surfaces bad keyword sets at startup instead of on the first link
    KeywordClassifier::from_config(config)?;

    Ok(())
}

/// Validates seed URLs and allowed domain entries
fn validate_domains(config: &DomainsConfig) -> ConfigResult<()> {
    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "At least one seed URL is required".to_string(),
        ));
    }

    if config.allowed.is_empty() {
        return Err(ConfigError::Validation(
            "At least one allowed domain is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed
            )));
        }
    }

    for domain in &config.allowed {
        validate_domain_entry(domain)?;
    }

    Ok(())
}

/// Validates one allow-list entry
///
/// Entries are matched as host substrings, so a bare label such as
/// `localhost` is accepted.
fn validate_domain_entry(domain: &str) -> ConfigResult<()> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Allowed domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

/// Validates notification settings; only checked when delivery is enabled
fn validate_notify_config(config: &NotifyConfig) -> ConfigResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let endpoint = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid notify endpoint '{}': {}", config.endpoint, e))
    })?;
    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Notify endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if config.recipients.is_empty() {
        return Err(ConfigError::Validation(
            "notify.recipients must list at least one address".to_string(),
        ));
    }

    for recipient in &config.recipients {
        validate_email(recipient.trim())?;
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> ConfigResult<()> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "recipient cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
