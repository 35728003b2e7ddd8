use std::sync::LazyLock;

use testing_framework_env as tf_env;

pub mod constants;
pub mod settings;

pub use settings::{FixtureSettings, SettingsError};

pub static IS_DEBUG_TRACING: LazyLock<bool> = LazyLock::new(tf_env::debug_tracing);
