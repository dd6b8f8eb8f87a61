//! Logging init: `tracing` subscriber writing to stdout.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,media_relay=debug,media_relay_lib=debug,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Calling it twice is harmless; the second install is ignored.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
