use crate::config::types::{BackendConfig, Config, PollerConfig};
use crate::ConfigError;
use url::Url;

/// Smallest accepted poll interval; anything lower hammers the backend
const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_backend_config(&config.backend)?;
    validate_poller_config(&config.poller)?;
    Ok(())
}

/// Validates backend configuration
fn validate_backend_config(config: &BackendConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates poller configuration
fn validate_poller_config(config: &PollerConfig) -> Result<(), ConfigError> {
    if config.poll_interval_ms < MIN_POLL_INTERVAL_MS {
        return Err(ConfigError::Validation(format!(
            "poll-interval-ms must be >= {}ms, got {}ms",
            MIN_POLL_INTERVAL_MS, config.poll_interval_ms
        )));
    }

    Ok(())
}
