use std::path::PathBuf;

use testing_framework_core::{CleanupGuard, block_on_detached};
use tracing::{debug, info, warn};

use crate::{cli::CliError, infrastructure::scripts::delete_app};

/// Deletes a pushed app unless preservation is requested.
#[derive(Debug)]
pub struct DeploymentCleanup {
    delete_script: PathBuf,
    app_name: String,
    preserve: bool,
}

impl DeploymentCleanup {
    pub fn new(delete_script: PathBuf, app_name: String, preserve: bool) -> Self {
        debug_assert!(!app_name.is_empty(), "cf cleanup requires an app name");
        Self {
            delete_script,
            app_name,
            preserve,
        }
    }

    pub async fn run(&self) -> Result<(), CliError> {
        if self.preserve {
            info!(app = %self.app_name, "preserve flag set; skipping app deletion");
            return Ok(());
        }

        delete_app(&self.delete_script, &self.app_name).await
    }
}

impl CleanupGuard for DeploymentCleanup {
    fn cleanup(self: Box<Self>) {
        debug!(
            app = %self.app_name,
            script = %self.delete_script.display(),
            preserve = self.preserve,
            "deployment cleanup started"
        );

        let app_name = self.app_name.clone();
        match block_on_detached("cf-fixture-cleanup", async move { self.run().await }) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(app = %app_name, error = %err, "app deletion failed during cleanup"),
            Err(err) => warn!(app = %app_name, error = ?err, "unable to run cleanup thread"),
        }
    }
}
