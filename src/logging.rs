//! Diagnostics go to stderr through `tracing`; stdout is reserved for results.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "GHK_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Level comes from `GHK_LOG` (default `warn`).
pub fn init() {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(env_filter())
        .try_init();
}
