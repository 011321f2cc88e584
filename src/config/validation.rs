use crate::config::types::{CrawlConfig, RetryConfig};
use crate::ConfigError;
use url::Url;

/// Longest accepted pause between requests, in seconds
pub const MAX_RATE_INTERVAL_SECS: f64 = 3600.0;

/// Longest accepted request timeout, in seconds
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Upper bound for `max-attempts` and `forbidden-retries`
pub const MAX_RETRY_ATTEMPTS: u32 = 20;

/// Validates the entire configuration
///
/// A failing configuration is fatal: the crawl never starts.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_seeds(&config.seed_urls)?;
    validate_allowed_domains(&config.allowed_domains)?;
    validate_pacing(config)?;
    validate_retry_config(&config.retry)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed URLs: at least one, all absolute HTTP(S) with a host
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed.trim())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' must use http or https",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates the allowed-domain list
fn validate_allowed_domains(domains: &[String]) -> Result<(), ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "at least one allowed domain is required".to_string(),
        ));
    }

    for domain in domains {
        validate_domain_string(domain)?;
    }

    Ok(())
}

fn validate_pacing(config: &CrawlConfig) -> Result<(), ConfigError> {
    if !(0.0..=MAX_RATE_INTERVAL_SECS).contains(&config.rate_interval) {
        return Err(ConfigError::Validation(format!(
            "rate-interval must be between 0 and {} seconds, got {}",
            MAX_RATE_INTERVAL_SECS, config.rate_interval
        )));
    }

    if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&config.request_timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and {}, got {}",
            MAX_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_retry_config(retry: &RetryConfig) -> Result<(), ConfigError> {
    if !(1..=MAX_RETRY_ATTEMPTS).contains(&retry.max_attempts) {
        return Err(ConfigError::Validation(format!(
            "retry max-attempts must be between 1 and {}, got {}",
            MAX_RETRY_ATTEMPTS, retry.max_attempts
        )));
    }

    if retry.forbidden_retries >= MAX_RETRY_ATTEMPTS {
        return Err(ConfigError::Validation(format!(
            "retry forbidden-retries must be below {}, got {}",
            MAX_RETRY_ATTEMPTS, retry.forbidden_retries
        )));
    }

    if retry.base_delay_ms > retry.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "retry base-delay-ms ({}) exceeds max-delay-ms ({})",
            retry.base_delay_ms, retry.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates a domain string such as `example.com`
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
