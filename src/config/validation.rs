//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend URLs parse and carry a usable scheme and host
//! - Validate value ranges (intervals and timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::BalancerConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no backends configured")]
    NoBackends,

    #[error("invalid backend URL `{url}`: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("health check path `{0}` must start with '/'")]
    InvalidHealthPath(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    for raw in &config.backends {
        if let Some(reason) = backend_url_problem(raw) {
            errors.push(ValidationError::InvalidBackendUrl {
                url: raw.clone(),
                reason,
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if !config.health_check.path.starts_with('/') {
        errors.push(ValidationError::InvalidHealthPath(
            config.health_check.path.clone(),
        ));
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("health_check.interval_secs"));
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("health_check.timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Why a backend URL is unusable, if it is.
///
/// Backends are base URLs: scheme + authority only. The forwarding path
/// takes its path entirely from the inbound request, so a path component
/// here would be silently ignored; reject it instead.
fn backend_url_problem(raw: &str) -> Option<String> {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(error) => return Some(error.to_string()),
    };

    if !matches!(url.scheme(), "http" | "https") {
        return Some(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Some("missing host".to_string());
    }
    if url.path() != "/" {
        return Some("must not carry a path".to_string());
    }
    if url.query().is_some() {
        return Some("must not carry a query string".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> BalancerConfig {
        BalancerConfig {
            backends: vec![
                "http://localhost:8080/".to_string(),
                "http://localhost:8081".to_string(),
            ],
            ..BalancerConfig::default()
        }
    }

    #[test]
    fn accepts_well_formed_config() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn rejects_empty_backend_list() {
        let config = BalancerConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::NoBackends)));
    }

    #[test]
    fn rejects_unparsable_backend_url() {
        let mut config = base_config();
        config.backends.push("not a url".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidBackendUrl { .. })));
    }

    #[test]
    fn rejects_backend_url_with_path() {
        let mut config = base_config();
        config.backends.push("http://localhost:8082/api".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut config = base_config();
        config.backends = vec!["ftp://localhost:21/".to_string()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_zero_probe_interval() {
        let mut config = base_config();
        config.health_check.interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroDuration(_))));
    }

    #[test]
    fn rejects_health_path_without_leading_slash() {
        let mut config = base_config();
        config.health_check.path = "health".to_string();
        assert!(validate_config(&config).is_err());
    }
}
