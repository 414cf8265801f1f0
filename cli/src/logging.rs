//! Diagnostic logging to stderr.
//!
//! Stdout belongs to the forwarded tool and to `--json` documents, so log
//! lines never go there.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive, e.g. `debug`.
pub const LOG_ENV: &str = "STEVEDORE_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
