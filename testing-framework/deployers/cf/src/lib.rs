mod cli;
mod errors;
mod fixture;
mod identity;
mod infrastructure;
mod lifecycle;

pub use cli::{CfCli, CliError, PushRequest};
pub use errors::CfRunnerError;
pub use fixture::CfFixture;
pub use identity::AppIdentity;
pub use infrastructure::{
    artifact::ArtifactError,
    environment::{EnvironmentMap, base_environment, merge_environment},
    workspace::WorkspaceError,
};
pub use testing_framework_config::{
    FixtureSettings, SettingsError,
    constants::{DEFAULT_PROBE_PATH, DEFAULT_PROBE_STATUS},
};
pub use testing_framework_core::http_probe::HttpProbeError;
