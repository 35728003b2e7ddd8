use testing_framework_env as tf_env;
use tracing_subscriber::{EnvFilter, fmt};

use crate::IS_DEBUG_TRACING;

const DEFAULT_TEST_FILTER: &str = "info";

/// Install a fmt subscriber for test output when `CF_TESTS_TRACING=true`.
///
/// Safe to call from every test; only the first successful call installs a
/// subscriber.
pub fn init_test_tracing() {
    if !*IS_DEBUG_TRACING {
        return;
    }

    let filter = tf_env::rust_log()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_TEST_FILTER));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
