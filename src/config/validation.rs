use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::parse_root;
use crate::ConfigError;

/// Upper bound on configured concurrency
const MAX_CONCURRENCY: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.root_url {
        parse_root(root)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root-url '{}': {}", root, e)))?;
    }

    if let Some(concurrency) = config.concurrency {
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(ConfigError::Validation(format!(
                "concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY, concurrency
            )));
        }
    }

    if let Some(timeout) = config.timeout_secs {
        if timeout < 1 {
            return Err(ConfigError::Validation(format!(
                "timeout-secs must be >= 1, got {}",
                timeout
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if let Some(name) = &config.crawler_name {
        // Non-empty, alphanumeric + hyphens only
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "crawler-name cannot be empty".to_string(),
            ));
        }

        if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
                name
            )));
        }
    }

    if let Some(version) = &config.crawler_version {
        if version.trim().is_empty() || version.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "crawler-version must be a single non-empty token, got '{}'",
                version
            )));
        }

        if config.crawler_name.is_none() {
            return Err(ConfigError::Validation(
                "crawler-version requires crawler-name".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.sitemap_path {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sitemap-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
