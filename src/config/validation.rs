use crate::config::types::{Config, CrawlerConfig, UserAgentConfig, VisitMode};
use crate::{ConfigError, ConfigResult};

/// Upper bound on the worker pool size
const MAX_CONCURRENCY: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Parses the configured mode, rejecting anything but LINK and ASSET
pub fn parse_mode(mode: &str) -> ConfigResult<VisitMode> {
    mode.parse()
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.fetch_timeout_secs
    {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and fetch-timeout-secs ({}), got {}",
            config.fetch_timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.expected_pages < 1 {
        return Err(ConfigError::Validation(
            "expected-pages must be >= 1".to_string(),
        ));
    }

    if !(config.false_positive_rate > 0.0 && config.false_positive_rate < 1.0) {
        return Err(ConfigError::Validation(format!(
            "false-positive-rate must be strictly between 0 and 1, got {}",
            config.false_positive_rate
        )));
    }

    parse_mode(&config.mode)?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    Ok(())
}
