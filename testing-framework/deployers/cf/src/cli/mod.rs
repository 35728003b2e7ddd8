use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::{Output, Stdio},
};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors returned from `cf` and helper-script invocations.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} exited with status {status:?}\nstderr:\n{stderr}\nstdout:\n{stdout}")]
    Failed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl CliError {
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { command, .. } | Self::Failed { command, .. } => command,
        }
    }
}

/// Arguments for `cf push`. The app is created stopped so its environment
/// can be configured before the first start.
#[derive(Clone, Debug)]
pub struct PushRequest<'a> {
    pub app_name: &'a str,
    pub domain: &'a str,
    pub subdomain: &'a str,
    pub artifact: &'a Path,
    pub disk_quota: &'a str,
    pub memory: &'a str,
    pub buildpack: &'a str,
}

impl PushRequest<'_> {
    fn args(&self) -> Vec<OsString> {
        vec![
            "push".into(),
            self.app_name.into(),
            "-d".into(),
            self.domain.into(),
            "-p".into(),
            self.artifact.into(),
            "-n".into(),
            self.subdomain.into(),
            "--no-start".into(),
            "-k".into(),
            self.disk_quota.into(),
            "-m".into(),
            self.memory.into(),
            "-b".into(),
            self.buildpack.into(),
        ]
    }
}

/// Thin wrapper around the `cf` executable.
#[derive(Clone, Debug)]
pub struct CfCli {
    bin: PathBuf,
}

impl CfCli {
    #[must_use]
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args.into_iter().map(Into::into));
        cmd
    }

    pub async fn push(&self, request: &PushRequest<'_>) -> Result<(), CliError> {
        info!(
            app = request.app_name,
            domain = request.domain,
            artifact = %request.artifact.display(),
            buildpack = request.buildpack,
            "pushing app"
        );

        let command = format!("cf push {}", request.app_name);
        run_command(self.command(request.args()), &command).await?;

        info!(app = request.app_name, "cf push completed");
        Ok(())
    }

    pub async fn start(&self, app_name: &str) -> Result<(), CliError> {
        let command = format!("cf start {app_name}");
        run_command(self.command(["start", app_name]), &command).await?;
        Ok(())
    }

    /// Unique instance identifier the control-plane API addresses the app by.
    pub async fn app_guid(&self, app_name: &str) -> Result<String, CliError> {
        let command = format!("cf app {app_name} --guid");
        let output = run_command(self.command(["app", app_name, "--guid"]), &command).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    pub async fn recent_logs(&self, app_name: &str) -> Result<String, CliError> {
        let command = format!("cf logs {app_name} --recent");
        let output = run_command(self.command(["logs", app_name, "--recent"]), &command).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// `cf curl -X PUT <path> -d <body>`, returning the response body.
    pub async fn curl_put(&self, path: &str, body: &str) -> Result<String, CliError> {
        let command = format!("cf curl -X PUT {path}");
        let output = run_command(
            self.command(["curl", "-X", "PUT", path, "-d", body]),
            &command,
        )
        .await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run `cmd` to completion with captured output, failing on non-zero exit.
pub(crate) async fn run_command(mut cmd: Command, command: &str) -> Result<Output, CliError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    debug!(command, "running command");

    let output = cmd.output().await.map_err(|source| CliError::Spawn {
        command: command.to_owned(),
        source,
    })?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(CliError::Failed {
            command: command.to_owned(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
