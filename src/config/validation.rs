//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse, status codes)
//! - Detect duplicate upstream routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::GateConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("upstream route '{0}' must start with '/'")]
    InvalidRoutePath(String),

    #[error("upstream route '{path}' has invalid method '{method}'")]
    InvalidRouteMethod { path: String, method: String },

    #[error("upstream route '{path}' has invalid status {status}")]
    InvalidRouteStatus { path: String, status: u16 },

    #[error("upstream route '{method} {path}' is defined more than once")]
    DuplicateRoute { path: String, method: String },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if !LOG_LEVELS.contains(&observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut seen = HashSet::new();
    for route in &config.upstream.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
        }

        match route.method.parse::<Method>() {
            Ok(method) => {
                if !seen.insert((route.path.clone(), method)) {
                    errors.push(ValidationError::DuplicateRoute {
                        path: route.path.clone(),
                        method: route.method.clone(),
                    });
                }
            }
            Err(_) => errors.push(ValidationError::InvalidRouteMethod {
                path: route.path.clone(),
                method: route.method.clone(),
            }),
        }

        if !(100..=999).contains(&route.status) {
            errors.push(ValidationError::InvalidRouteStatus {
                path: route.path.clone(),
                status: route.status,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::UpstreamRouteConfig;

    fn route(path: &str, method: &str, status: u16) -> UpstreamRouteConfig {
        UpstreamRouteConfig {
            path: path.into(),
            method: method.into(),
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GateConfig::default()), Ok(()));
    }

    #[test]
    fn test_zero_ceiling_is_valid() {
        let mut config = GateConfig::default();
        config.gate.ceiling = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = GateConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();
        config.upstream.routes = vec![
            route("app/status", "GET", 200),
            route("/x", "NOT A METHOD", 200),
            route("/y", "GET", 42),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::InvalidRoutePath("app/status".into())));
        assert!(errors.contains(&ValidationError::InvalidRouteStatus {
            path: "/y".into(),
            status: 42,
        }));
    }

    #[test]
    fn test_duplicate_routes() {
        let mut config = GateConfig::default();
        config.upstream.routes = vec![
            route("/a", "GET", 200),
            route("/a", "get", 201),
            route("/a", "POST", 200),
        ];

        // Method names are case-sensitive, so "get" is an extension method.
        assert!(validate_config(&config).is_ok());

        config.upstream.routes.push(route("/a", "GET", 204));
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::DuplicateRoute {
                path: "/a".into(),
                method: "GET".into(),
            }])
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GateConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidMetricsAddress("nowhere".into())])
        );
    }
}
