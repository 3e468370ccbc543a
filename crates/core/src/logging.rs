//! Tracing bootstrap helpers.
//!
//! Embedding binaries call [`init`] once at startup; tests use
//! [`init_test`], which is safe to call from every test function.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to `info` when the
/// variable is unset or unparsable.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Initialize tracing for tests with a test writer.
///
/// Repeated calls are ignored rather than panicking, so any test may call
/// this without coordinating with the others.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
