//! Tracing setup for binaries and tests embedding the core.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber, filtered by `PAGEKIT_LOG` (default
/// `info`). Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env("PAGEKIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
