//! Proxy settings evaluated for one request.

use std::time::Duration;

use crate::config::schema::{HeaderOverride, ProxyConfig};
use crate::expression::variables::RequestContext;
use crate::routing::router::ResolvedRoute;

pub const DEFAULT_PROXY_NAME: &str = "gwcore";
pub const DEFAULT_CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const DEFAULT_HTTP_VERSION: &str = "2.0";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(4 * 60);

/// A resolved route together with the request it was resolved for.
pub struct ProxyContext<'a> {
    request: &'a dyn RequestContext,
    route: &'a ResolvedRoute,
    proxy: &'a ProxyConfig,
}

impl<'a> ProxyContext<'a> {
    /// `None` if the route has no proxy settings.
    pub fn new(request: &'a dyn RequestContext, route: &'a ResolvedRoute) -> Option<Self> {
        let proxy = route.settings().proxy.as_ref()?;
        Some(Self { request, route, proxy })
    }

    pub fn route(&self) -> &ResolvedRoute {
        self.route
    }

    pub fn settings(&self) -> &ProxyConfig {
        self.proxy
    }

    /// Evaluate an expression against this request and route.
    pub fn evaluate(&self, expression: &str) -> String {
        self.route.evaluate(self.request, expression)
    }

    fn evaluate_optional(&self, expression: Option<&str>) -> Option<String> {
        expression
            .map(|e| self.evaluate(e))
            .filter(|v| !v.trim().is_empty())
    }

    /// Value of the proxy-name header. `None` means the header is not sent.
    pub fn proxy_name(&self) -> Option<String> {
        match &self.proxy.upstream_request.headers.proxy_name {
            None => Some(DEFAULT_PROXY_NAME.to_string()),
            Some(expression) => self.evaluate_optional(Some(expression)),
        }
    }

    /// Total time allowed for the upstream call.
    pub fn upstream_timeout(&self) -> Duration {
        self.evaluate_optional(self.proxy.upstream_request.sender.timeout_ms.as_deref())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|ms| *ms > 0)
            .map(|ms| Duration::from_millis(ms as u64))
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT)
    }

    /// The evaluated `to` expression.
    pub fn upstream_base_uri(&self) -> String {
        self.evaluate(&self.proxy.to).trim().to_string()
    }

    /// Base URI + path suffix + query string, joined by exactly one `/`.
    pub fn upstream_uri(&self) -> String {
        let base = self.upstream_base_uri();
        let suffix = self.route.path_suffix.trim_start_matches('/');
        let query = self.request.request_query_string().unwrap_or_default();

        let mut uri = String::with_capacity(base.len() + suffix.len() + query.len() + 1);
        uri.push_str(base.trim_end_matches('/'));
        uri.push('/');
        uri.push_str(suffix);
        uri.push_str(query);
        uri
    }

    /// HTTP version for the upstream request, e.g. `1.1` or `2.0`.
    pub fn upstream_http_version(&self) -> String {
        self.evaluate_optional(self.proxy.upstream_request.http_version.as_deref())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_HTTP_VERSION.to_string())
    }

    /// Header carrying the correlation id.
    pub fn correlation_id_header(&self) -> &str {
        self.proxy
            .correlation_id_header
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_CORRELATION_ID_HEADER)
    }

    /// Host to send upstream when the downstream request carries none.
    pub fn default_host(&self) -> Option<String> {
        self.evaluate_optional(self.proxy.upstream_request.headers.default_host.as_deref())
    }

    /// Upstream request header overrides with their values evaluated.
    pub fn request_header_overrides(&self) -> Vec<(String, Vec<String>)> {
        self.evaluate_overrides(&self.proxy.upstream_request.headers.overrides)
    }

    /// Downstream response header overrides with their values evaluated.
    pub fn response_header_overrides(&self) -> Vec<(String, Vec<String>)> {
        self.evaluate_overrides(&self.proxy.downstream_response.headers.overrides)
    }

    fn evaluate_overrides(&self, overrides: &[HeaderOverride]) -> Vec<(String, Vec<String>)> {
        overrides
            .iter()
            .map(|h| {
                let values = h.values.iter().map(|v| self.evaluate(v)).collect();
                (h.name.trim().to_string(), values)
            })
            .collect()
    }
}
