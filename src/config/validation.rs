use crate::config::types::{Config, CrawlerConfig, DomainConfig, OutputConfig, SessionConfig};
use crate::range::Codepoint;
use crate::ConfigError;
use url::Url;

/// Lowest accepted delay between requests (milliseconds)
pub const MIN_DELAY_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_session_config(&config.session)?;
    validate_crawler_config(&config.crawler)?;
    validate_domain_config(&config.domain)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates that login credentials are present
///
/// Only crawling needs credentials, so this is kept out of [`validate`].
pub fn validate_credentials(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.username.is_empty() {
        return Err(ConfigError::Validation(
            "username cannot be empty".to_string(),
        ));
    }

    if config.password.is_empty() {
        return Err(ConfigError::Validation(
            "password cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates session configuration
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    for (name, path) in [
        ("login-path", &config.login_path),
        ("page-path", &config.page_path),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{} must start with '/', got '{}'",
                name, path
            )));
        }
    }

    if config.valid_page_marker.is_empty() {
        return Err(ConfigError::Validation(
            "valid-page-marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.delay_ms < MIN_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be >= {}ms, got {}ms",
            MIN_DELAY_MS, config.delay_ms
        )));
    }

    if config.attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "attempts must be >= 1, got {}",
            config.attempts
        )));
    }

    Ok(())
}

/// Validates the default domain
fn validate_domain_config(config: &DomainConfig) -> Result<(), ConfigError> {
    if config.upper > Codepoint::MAX.value() {
        return Err(ConfigError::Validation(format!(
            "domain upper bound {:#x} is beyond {}",
            config.upper,
            Codepoint::MAX
        )));
    }

    if config.lower > config.upper {
        return Err(ConfigError::Validation(format!(
            "domain lower bound {:#x} is above upper bound {:#x}",
            config.lower, config.upper
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.prefix.contains(|c: char| c == '/' || c == '\\') {
        return Err(ConfigError::Validation(format!(
            "prefix cannot contain path separators, got '{}'",
            config.prefix
        )));
    }

    if config.extension.is_empty() || !config.extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "extension must be non-empty and alphanumeric, got '{}'",
            config.extension
        )));
    }

    Ok(())
}
