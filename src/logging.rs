use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LogSettings;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_target(true).with_ansi(false))
            .init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}
