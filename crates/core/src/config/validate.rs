use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Source base URL is non-empty
/// - At least one catalog endpoint, with no duplicates
/// - TTL and preload timeout are nonzero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.source.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "source.base_url cannot be empty".to_string(),
        ));
    }

    if config.catalog.endpoints.is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.endpoints cannot be empty".to_string(),
        ));
    }

    let unique: HashSet<&str> = config.catalog.endpoints.iter().map(String::as_str).collect();
    if unique.len() != config.catalog.endpoints.len() {
        return Err(ConfigError::ValidationError(
            "catalog.endpoints contains duplicates".to_string(),
        ));
    }

    if config.catalog.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.ttl_secs cannot be 0".to_string(),
        ));
    }

    if config.preload.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "preload.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
