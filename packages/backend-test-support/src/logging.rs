//! One-shot tracing setup for unit and integration test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static TEST_SUBSCRIBER: OnceCell<()> = OnceCell::new();

/// Install a test subscriber exactly once per process.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `warn`.
/// Output goes through the libtest writer so it is captured per test.
pub fn init() {
    TEST_SUBSCRIBER.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(true);

        // Another harness may already own the global subscriber.
        let _ = builder.try_init();
    });
}
