pub mod cleanup;
pub mod http_probe;
mod logging;

pub use cleanup::{CleanupGuard, block_on_detached};
pub use logging::init_test_tracing;
pub use testing_framework_config::IS_DEBUG_TRACING;
