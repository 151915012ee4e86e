use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a crawler configuration file and validates it
///
/// Sections missing from the file fall back to the built-in marketing
/// crawl defaults before validation runs, so an empty file is a complete
/// configuration. A file that loads here is safe to start a crawl with.
///
/// # Returns
///
/// * `Ok(Config)` - The merged, validated configuration
/// * `Err(ConfigError)` - The file cannot be read or parsed, or a setting
///   would stop the crawl from starting
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use mkt_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Seeds: {}", config.domains.seeds.len());
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let raw = std::fs::read_to_string(path)?;
    let config = toml::from_str::<Config>(&raw)?;
    validate(&config).map(|()| config)
}

/// Fingerprints the raw bytes of a configuration file
///
/// The hex SHA-256 is logged next to "Configuration loaded" so a
/// `marketing_urls.json` can be matched to the seeds and keywords that
/// produced it. Any byte change, whitespace included, changes it.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let digest = Sha256::digest(std::fs::read(path)?);
    Ok(hex::encode(digest))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
