//! Configuration schema definitions.
//!
//! This module defines the configuration consumed by the routing and
//! expression core. All types derive Serde traits so the surrounding gateway
//! can deserialize them from whatever format it loads.
//!
//! Fields documented as "expression" may contain `$name` references and are
//! evaluated per request.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Process-wide limits.
    pub system: SystemConfig,

    /// Route definitions, in match order (first match wins).
    pub routes: Vec<RouteConfig>,
}

/// Process-wide limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    /// Maximum number of routes a configuration may declare.
    pub max_route_count: usize,

    /// Paths longer than this (in bytes) never match any route.
    pub max_path_length: usize,

    /// Wall-clock budget for one route resolution, in milliseconds.
    pub match_budget_ms: u64,

    /// Maximum compiled expressions cached per route.
    pub expression_cache_limit: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_route_count: 1024,
            max_path_length: 8 * 1024,
            match_budget_ms: 1000,
            expression_cache_limit: 10_000,
        }
    }
}

/// A route pattern and its per-route settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouteConfig {
    /// Route pattern, e.g. `/api(/v:version)/product/:id`.
    pub pattern: String,

    /// Proxy settings. A route without them matches but forwards nowhere.
    pub proxy: Option<ProxyConfig>,
}

impl RouteConfig {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// Where and how to forward a matched request.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Upstream base URI (expression).
    pub to: String,

    /// Header carrying the correlation id (default `x-correlation-id`).
    pub correlation_id_header: Option<String>,

    pub upstream_request: UpstreamRequestConfig,

    pub downstream_response: DownstreamResponseConfig,
}

impl ProxyConfig {
    pub fn to(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..Default::default()
        }
    }
}

/// Settings for the outbound upstream request.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct UpstreamRequestConfig {
    /// HTTP version to use upstream (expression, default `2.0`).
    pub http_version: Option<String>,

    pub headers: UpstreamHeadersConfig,

    pub sender: SenderConfig,
}

/// Header handling for the outbound upstream request.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct UpstreamHeadersConfig {
    /// Host used when the downstream request has none (expression).
    pub default_host: Option<String>,

    /// Value of the proxy-name header (expression, default `gwcore`).
    pub proxy_name: Option<String>,

    /// Headers added to or replaced on the upstream request.
    pub overrides: Vec<HeaderOverride>,
}

/// Upstream sender settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SenderConfig {
    /// Total upstream timeout in milliseconds (expression).
    pub timeout_ms: Option<String>,
}

/// Settings for the response sent back downstream.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DownstreamResponseConfig {
    pub headers: DownstreamHeadersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DownstreamHeadersConfig {
    /// Headers added to or replaced on the downstream response.
    pub overrides: Vec<HeaderOverride>,
}

/// A header whose values are expressions.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct HeaderOverride {
    pub name: String,
    pub values: Vec<String>,
}

impl HeaderOverride {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}
