//! Tracing subscriber setup for the `folio` binary.
//!
//! Events go to stderr so that stdout stays parseable for `--json` output
//! and `folio export`. The filter comes from `FOLIO_LOG` (same syntax as
//! `RUST_LOG`) and defaults to `warn`, which surfaces excluded articles
//! without pipeline chatter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "FOLIO_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Build the filter from `FOLIO_LOG`, falling back to `warn`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_tracing(json: bool) {
    let filter = env_filter();
    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
