//! Routing and templating core of a reverse-proxy gateway.
//!
//! Route patterns such as `/api(/v:version)/product/:id` are compiled into
//! matchers, and per-route settings are `$variable` expressions evaluated
//! against the request and the variables extracted from its path.

pub mod config;
pub mod expression;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use expression::{RequestContext, RequestInfo};
pub use proxy::ProxyContext;
pub use routing::{ResolvedRoute, RouteTable};
