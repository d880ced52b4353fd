//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the filter passed by the caller is
//! used. `--json` switches to machine-readable output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "gateway_routes=info";

/// Install the global subscriber. Calling it twice is an error.
pub fn init_logging(
    default_filter: &str,
    json: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
