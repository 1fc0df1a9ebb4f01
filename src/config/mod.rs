//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig (deserialized by the surrounding gateway)
//!     → validation.rs (semantic checks)
//!     → routing::RouteTable::reload (compile patterns, build snapshot)
//!     → atomic swap of the route table snapshot
//!
//! On reload:
//!     new GatewayConfig
//!     → validation.rs validates
//!     → rejected: current snapshot stays live
//!     → accepted: new snapshot swapped in, in-flight requests keep the old one
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Reading configuration files is the caller's job

pub mod schema;
pub mod validation;

pub use schema::{
    DownstreamHeadersConfig, DownstreamResponseConfig, GatewayConfig, HeaderOverride, ProxyConfig, RouteConfig,
    SenderConfig, SystemConfig, UpstreamHeadersConfig, UpstreamRequestConfig,
};
pub use validation::{validate_config, ValidationError};
