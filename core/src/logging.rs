//! Tracing initialization shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber using the given filter directive
/// (e.g. the config's `log_filter` field) as a fallback when `RUST_LOG` is unset.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
