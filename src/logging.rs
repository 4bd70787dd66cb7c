//! Console logging setup.
//!
//! The library only emits `tracing` events; binaries and demos call
//! [`init_logging`] once to print them.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_level` when
/// `RUST_LOG` is unset or invalid.
///
/// Safe to call more than once. An already installed global subscriber is
/// left in place.
pub fn init_logging(default_level: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive(default_level)));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .try_init();

        tracing::debug!(default_level, "logging initialized");
    });
}

/// Lowercased level name, `info` when blank.
fn filter_directive(level: &str) -> String {
    match level.trim() {
        "" => "info".to_string(),
        level => level.to_lowercase(),
    }
}
