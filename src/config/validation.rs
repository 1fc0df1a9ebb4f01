//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce the route count ceiling
//! - Check per-route settings that can be checked before a request arrives
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Whole-configuration errors reject the configuration; route errors only
//!   exclude the offending route (see `routing::router`)

use thiserror::Error;

use crate::config::schema::{GatewayConfig, RouteConfig};

/// A semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Configuration declares {count} routes, the maximum is {max}")]
    TooManyRoutes { count: usize, max: usize },

    #[error("system.max_path_length must be greater than zero")]
    ZeroPathLength,

    #[error("Route '{pattern}': proxy 'to' must not be empty")]
    EmptyUpstream { pattern: String },

    #[error("Route '{pattern}': header override with an empty name")]
    EmptyHeaderName { pattern: String },
}

impl ValidationError {
    /// True if this error invalidates the whole configuration.
    pub fn is_global(&self) -> bool {
        matches!(self, ValidationError::TooManyRoutes { .. } | ValidationError::ZeroPathLength)
    }

    /// The pattern of the offending route, for route-level errors.
    pub fn route_pattern(&self) -> Option<&str> {
        match self {
            ValidationError::EmptyUpstream { pattern } | ValidationError::EmptyHeaderName { pattern } => {
                Some(pattern)
            }
            _ => None,
        }
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.len() > config.system.max_route_count {
        errors.push(ValidationError::TooManyRoutes {
            count: config.routes.len(),
            max: config.system.max_route_count,
        });
    }

    if config.system.max_path_length == 0 {
        errors.push(ValidationError::ZeroPathLength);
    }

    for route in &config.routes {
        errors.extend(validate_route(route));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Route-level checks; pattern syntax is checked when the pattern is compiled.
pub fn validate_route(route: &RouteConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let Some(proxy) = &route.proxy else {
        return errors;
    };

    if proxy.to.trim().is_empty() {
        errors.push(ValidationError::EmptyUpstream {
            pattern: route.pattern.clone(),
        });
    }

    let mut overrides = proxy
        .upstream_request
        .headers
        .overrides
        .iter()
        .chain(&proxy.downstream_response.headers.overrides);
    if overrides.any(|h| h.name.trim().is_empty()) {
        errors.push(ValidationError::EmptyHeaderName {
            pattern: route.pattern.clone(),
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{HeaderOverride, ProxyConfig, SystemConfig};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut proxy = ProxyConfig::to("");
        proxy
            .upstream_request
            .headers
            .overrides
            .push(HeaderOverride::new(" ", ["x"]));

        let config = GatewayConfig {
            system: SystemConfig {
                max_route_count: 1,
                max_path_length: 0,
                ..Default::default()
            },
            routes: vec![
                RouteConfig::new("/a").with_proxy(proxy),
                RouteConfig::new("/b"),
            ],
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::TooManyRoutes { count: 2, max: 1 },
                ValidationError::ZeroPathLength,
                ValidationError::EmptyUpstream { pattern: "/a".into() },
                ValidationError::EmptyHeaderName { pattern: "/a".into() },
            ]
        );
        assert!(errors[0].is_global());
        assert_eq!(errors[2].route_pattern(), Some("/a"));
    }

    #[test]
    fn test_route_without_proxy_is_valid() {
        assert!(validate_route(&RouteConfig::new("/health")).is_empty());
    }
}
