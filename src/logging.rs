//! Logging configuration for cinema-db.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
