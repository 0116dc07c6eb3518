// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber, level taken from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialises the global subscriber. Logs go to stderr; stdout carries
/// command output.
///
/// # Environment
/// - RUST_LOG: filter directive (default: info),
///   e.g. `RUST_LOG=terra_em_dia=debug`
///
/// # Example
/// ```no_run
/// use terra_em_dia::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Same as [`init`] but emitting JSON lines, for log shipping.
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Test subscriber: debug level, captured by the test harness.
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
