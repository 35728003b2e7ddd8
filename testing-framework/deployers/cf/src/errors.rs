use testing_framework_config::SettingsError;
use testing_framework_core::http_probe::HttpProbeError;
use thiserror::Error;

use crate::{
    cli::CliError,
    infrastructure::{artifact::ArtifactError, workspace::WorkspaceError},
};

/// Failures surfaced by `CfFixture` to the calling test.
#[derive(Debug, Error)]
pub enum CfRunnerError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error("`cf app {app} --guid` printed no guid")]
    EmptyGuid { app: String },
    #[error("failed to encode environment for {app}: {source}")]
    Payload {
        app: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Http(#[from] HttpProbeError),
    #[error("failed to find `{substring}` in recent logs of {app}:\n{logs}")]
    SubstringNotInLogs {
        app: String,
        substring: String,
        logs: String,
    },
}
