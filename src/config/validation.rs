use crate::config::types::{
    BatchConfig, Config, DiscoveryConfig, HttpConfig, InputConfig, JobsConfig, OutputConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_discovery_config(&config.discovery)?;
    validate_jobs_config(&config.jobs)?;
    validate_batch_config(&config.batch)?;
    validate_output_config(&config.output)?;
    validate_input_config(&config.input)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("probe_timeout_secs", config.probe_timeout_secs),
        ("fetch_timeout_secs", config.fetch_timeout_secs),
        ("connect_timeout_secs", config.connect_timeout_secs),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    if config.max_in_flight_requests < 1 || config.max_in_flight_requests > 256 {
        return Err(ConfigError::Validation(format!(
            "max_in_flight_requests must be between 1 and 256, got {}",
            config.max_in_flight_requests
        )));
    }

    if config.probe_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "probe_retries must be <= 10, got {}",
            config.probe_retries
        )));
    }

    Ok(())
}

/// Validates sitemap discovery configuration
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.hop_budget < 1 || config.hop_budget > 20 {
        return Err(ConfigError::Validation(format!(
            "hop_budget must be between 1 and 20, got {}",
            config.hop_budget
        )));
    }

    if config.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be >= 1, got {}",
            config.max_depth
        )));
    }

    for path in &config.sitemap_paths {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() || trimmed.contains("://") {
            return Err(ConfigError::Validation(format!(
                "sitemap path '{}' must be a non-empty relative path",
                path
            )));
        }
    }

    Ok(())
}

/// Validates job API configuration
fn validate_jobs_config(config: &JobsConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if !config.backoff_factor.is_finite() || config.backoff_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_factor must be >= 1.0, got {}",
            config.backoff_factor
        )));
    }

    if config.request_timeout_secs < 1 || config.max_poll_secs < 1 {
        return Err(ConfigError::Validation(
            "job timeouts must be >= 1 second".to_string(),
        ));
    }

    // The API address only matters when submissions are turned on
    if config.enabled {
        let url = Url::parse(&config.api_base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base_url: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "api_base_url '{}' must use http or https",
                config.api_base_url
            )));
        }
    }

    Ok(())
}

/// Validates batch concurrency
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_sites < 1 || config.max_concurrent_sites > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_sites must be between 1 and 100, got {}",
            config.max_concurrent_sites
        )));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("results_path", &config.results_path),
        ("pages_path", &config.pages_path),
        ("log_path", &config.log_path),
        ("job_results_dir", &config.job_results_dir),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }
    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.sites_path.is_empty() {
        return Err(ConfigError::Validation(
            "sites_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
