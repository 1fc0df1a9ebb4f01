//! Correlation and call identifiers.

use uuid::Uuid;

use crate::expression::variables::RequestInfo;

/// A fresh identifier: a random UUID as 32 lowercase hex digits.
pub fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `host[:port]` → `host`. Bracketed IPv6 literals keep their brackets.
pub fn host_without_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        // More than one ':' without brackets is a bare IPv6 address.
        Some((name, _)) if !name.contains(':') => name,
        _ => host,
    }
}

impl RequestInfo {
    /// Assign the correlation id (the inbound header value, or a fresh id when
    /// absent or blank) and a fresh call id.
    pub fn with_trace_ids(mut self, correlation_header_value: Option<&str>) -> Self {
        let correlation_id = correlation_header_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(new_trace_id);

        self.correlation_id = Some(correlation_id);
        self.call_id = Some(new_trace_id());
        self
    }
}
