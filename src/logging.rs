/// Logging setup for the report service.
///
/// Uses `tracing` with an environment-driven filter: set `RUST_LOG` to
/// adjust verbosity (for example `RUST_LOG=airguide_service=debug`), with
/// `info` as the default. Call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. Panics if a subscriber is already
/// installed, which indicates a double initialization bug.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Test-friendly initialization: debug level, output captured per test,
/// safe to call from multiple tests.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
