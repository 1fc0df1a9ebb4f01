//! Metrics collection.
//!
//! # Metrics
//! - `gateway_route_resolutions_total` (counter): resolutions by `outcome`
//!   (`matched`, `miss`, `too_long`, `budget_exceeded`)
//! - `gateway_routes_rejected_total` (counter): routes excluded at load time
//! - `gateway_routes_installed` (gauge): routes in the live snapshot
//! - `gateway_expression_cache_misses_total` (counter): expressions compiled
//! - `gateway_expression_cache_inserts_total` (counter): compiled expressions
//!   published to a route's cache
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; exposition is the host's concern
//! - Label values are static strings so updates never allocate

pub const ROUTE_RESOLUTIONS: &str = "gateway_route_resolutions_total";
pub const ROUTES_REJECTED: &str = "gateway_routes_rejected_total";
pub const ROUTES_INSTALLED: &str = "gateway_routes_installed";
pub const EXPRESSION_CACHE_MISSES: &str = "gateway_expression_cache_misses_total";
pub const EXPRESSION_CACHE_INSERTS: &str = "gateway_expression_cache_inserts_total";

/// Count one route resolution.
pub fn record_resolution(outcome: &'static str) {
    ::metrics::counter!(ROUTE_RESOLUTIONS, "outcome" => outcome).increment(1);
}

pub fn record_route_rejected() {
    ::metrics::counter!(ROUTES_REJECTED).increment(1);
}

pub fn record_routes_installed(count: usize) {
    ::metrics::gauge!(ROUTES_INSTALLED).set(count as f64);
}

pub fn record_expression_cache_miss() {
    ::metrics::counter!(EXPRESSION_CACHE_MISSES).increment(1);
}

pub fn record_expression_cache_insert() {
    ::metrics::counter!(EXPRESSION_CACHE_INSERTS).increment(1);
}
