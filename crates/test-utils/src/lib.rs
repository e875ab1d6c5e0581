//! Shared helpers for the bucketdag integration and property tests.

pub mod builders;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through `with_test_writer()`, so it only shows for failing
/// tests (or with `--nocapture`). The filter comes from `BUCKETDAG_LOG`,
/// e.g. `BUCKETDAG_LOG=bucketdag=debug cargo test`; default is `warn`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BUCKETDAG_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
