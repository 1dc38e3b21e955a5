//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BalancerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BalancerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: BalancerConfig = toml::from_str(
            r#"
            backends = ["http://localhost:8080/", "http://localhost:8081/"]

            [listener]
            bind_address = "127.0.0.1:9000"

            [health_check]
            interval_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.health_check.interval_secs, 2);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.health_check.path, "/health");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_config(Path::new("/nonexistent/balancer.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
