use std::path::Path;

use tokio::process::Command;
use tracing::info;

use crate::cli::{CliError, run_command};

/// Provision the backing services the app binds to.
pub async fn create_app_services(script: &Path, app_name: &str) -> Result<(), CliError> {
    info!(app = app_name, script = %script.display(), "creating app services");
    run_app_script(script, app_name).await?;
    info!(app = app_name, "app services created");
    Ok(())
}

/// Delete the app together with its routes and services.
pub async fn delete_app(script: &Path, app_name: &str) -> Result<(), CliError> {
    info!(app = app_name, script = %script.display(), "deleting app");
    run_app_script(script, app_name).await?;
    info!(app = app_name, "app deleted");
    Ok(())
}

async fn run_app_script(script: &Path, app_name: &str) -> Result<(), CliError> {
    let mut cmd = Command::new(script);
    cmd.arg(app_name);
    run_command(cmd, &format!("{} {app_name}", script.display())).await?;
    Ok(())
}
