//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / expression subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber the host process installs (or `logging::init`)
//!     → whatever metrics recorder the host process installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a global recorder or subscriber on its own
//! - Without a recorder, metric updates are no-ops
//! - Metric updates are cheap (atomic increments)

pub mod logging;
pub mod metrics;
