//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a `tracing` subscriber for binaries and tests embedding the crate
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the level passed in
//! - Installing twice is not an error; the first subscriber stays

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a formatting subscriber filtered by `RUST_LOG`, or by `default_level`
/// (e.g. `"gateway_core=info"`) when the variable is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init("gateway_core=debug");
        assert!(!init("gateway_core=debug"));
        tracing::debug!(component = "logging", "Subscriber installed");
    }
}
