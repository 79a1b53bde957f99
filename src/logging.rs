//! Console logging for the command-line binary.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install a stderr subscriber filtered by `RUST_LOG` (default `warn`).
/// Safe to call more than once.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
        let result = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .try_init();
        // Another subscriber (e.g. a test harness) may already be installed.
        if result.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
