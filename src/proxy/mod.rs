//! Per-request proxy settings.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → routing::RouteTable::resolve (ResolvedRoute: settings, variables, suffix)
//!     → trace.rs (correlation id, call id)
//!     → context.rs (ProxyContext: settings evaluated for this request)
//!     → the surrounding gateway builds and sends the upstream request
//! ```
//!
//! # Design Decisions
//! - Evaluation never fails; absent or unusable values fall back to defaults
//! - No I/O here: sending, header copying and response streaming live in the
//!   gateway that embeds this crate

pub mod context;
pub mod trace;

pub use context::ProxyContext;
pub use trace::{host_without_port, new_trace_id};
