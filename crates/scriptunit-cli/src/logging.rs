//! Tracing subscriber setup
//!
//! Logs go to stderr; stdout is reserved for harness output.

use scriptunit_config::loader::DEFAULT_LOG_LEVEL;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber at `level`
///
/// An unparsable level falls back to the default.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    // Fails only when a global subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
