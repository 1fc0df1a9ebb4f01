//! Shared utilities for integration tests.

#![allow(dead_code)]

use gateway_core::config::{GatewayConfig, ProxyConfig, RouteConfig};
use gateway_core::expression::RequestInfo;
use gateway_core::routing::RouteTable;

/// A proxied route forwarding to `to`.
pub fn route(pattern: &str, to: &str) -> RouteConfig {
    RouteConfig::new(pattern).with_proxy(ProxyConfig::to(to))
}

/// A configuration with default system limits.
pub fn config(routes: Vec<RouteConfig>) -> GatewayConfig {
    GatewayConfig {
        routes,
        ..Default::default()
    }
}

/// A table built from `routes`, panicking if the configuration is rejected.
pub fn table(routes: Vec<RouteConfig>) -> RouteTable {
    RouteTable::from_config(&config(routes)).expect("configuration rejected")
}

/// Deserialize a configuration from inline TOML.
pub fn config_from_toml(text: &str) -> GatewayConfig {
    toml::from_str(text).expect("invalid TOML configuration")
}

/// A request for `host` and `path` over https.
pub fn request(host: &str, path: &str) -> RequestInfo {
    RequestInfo {
        host: Some(host.to_string()),
        scheme: Some("https".to_string()),
        method: Some("GET".to_string()),
        path: Some(path.to_string()),
        protocol: Some("HTTP/1.1".to_string()),
        ..Default::default()
    }
}
