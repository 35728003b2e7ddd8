use std::path::{Path, PathBuf};

use reqwest::Client;
use testing_framework_config::{
    FixtureSettings,
    constants::{DEFAULT_PROBE_PATH, DEFAULT_PROBE_STATUS},
};
use testing_framework_core::{
    CleanupGuard as _,
    http_probe::{app_url, expect_status},
};
use tracing::{debug, info, warn};

use crate::{
    cli::{CfCli, PushRequest},
    errors::CfRunnerError,
    identity::AppIdentity,
    infrastructure::{
        artifact::download_package,
        environment::{EnvironmentMap, app_resource_path, merge_environment, update_body},
        scripts::create_app_services,
        workspace::FixtureWorkspace,
    },
    lifecycle::{
        cleanup::DeploymentCleanup,
        logs::{dump_recent_logs, emit_logs, logs_contain},
    },
};

/// Pushes one packaged app to Cloud Foundry for a test and removes it again.
///
/// Each fixture owns a random identity, so fixtures in concurrent tests never
/// share an app. A fixture dropped between `setup` and `teardown` deletes its
/// app from `Drop`.
pub struct CfFixture {
    settings: FixtureSettings,
    identity: AppIdentity,
    cli: CfCli,
    http: Client,
    workspace: Option<FixtureWorkspace>,
    cleanup: Option<DeploymentCleanup>,
}

impl CfFixture {
    /// Build a fixture from `CF_DOMAIN` and the other ambient variables.
    pub fn from_env() -> Result<Self, CfRunnerError> {
        Ok(Self::new(FixtureSettings::from_env()?))
    }

    #[must_use]
    pub fn new(settings: FixtureSettings) -> Self {
        let identity = AppIdentity::generate(&settings.domain);
        Self::from_parts(settings, identity)
    }

    /// Fixture with a fixed app id, routed under `settings.domain`.
    #[must_use]
    pub fn with_app_id(settings: FixtureSettings, app_id: impl Into<String>) -> Self {
        let identity = AppIdentity::from_app_id(app_id, &settings.domain);
        Self::from_parts(settings, identity)
    }

    fn from_parts(settings: FixtureSettings, identity: AppIdentity) -> Self {
        info!(
            app = identity.app_name(),
            domain = %settings.domain,
            branch = %settings.branch,
            "fixture identity generated"
        );
        Self {
            cli: CfCli::new(settings.cf_cli.clone()),
            http: Client::new(),
            settings,
            identity,
            workspace: None,
            cleanup: None,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        self.identity.app_name()
    }

    /// Directory the package was downloaded into, while setup holds one.
    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace.as_ref().map(FixtureWorkspace::root_path)
    }

    /// Push `package_name` with the default environment.
    pub async fn setup(&mut self, package_name: &str) -> Result<(), CfRunnerError> {
        self.setup_with_env(package_name, EnvironmentMap::new())
            .await
    }

    /// Download, push and configure the app without starting it.
    ///
    /// `overrides` are merged over the default environment. If any step
    /// fails the app is torn down before the error is returned.
    pub async fn setup_with_env<I, K, V>(
        &mut self,
        package_name: &str,
        overrides: I,
    ) -> Result<(), CfRunnerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let overrides: EnvironmentMap = overrides
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        if self.cleanup.is_none() {
            self.cleanup = Some(self.cleanup_guard());
        }

        info!(
            app = self.app_name(),
            package = package_name,
            overrides = overrides.len(),
            "setting up cf deployment"
        );

        if let Err(err) = self.deploy(package_name, overrides).await {
            warn!(app = self.app_name(), error = %err, "setup failed; tearing down");
            if let Err(teardown_err) = self.teardown().await {
                warn!(
                    app = self.app_name(),
                    error = %teardown_err,
                    "teardown after failed setup also failed"
                );
            }
            return Err(err);
        }

        info!(app = self.app_name(), "cf deployment configured");
        Ok(())
    }

    async fn deploy(
        &mut self,
        package_name: &str,
        overrides: EnvironmentMap,
    ) -> Result<(), CfRunnerError> {
        let artifact = self.fetch_package(package_name).await?;

        let buildpack = self.settings.buildpack_url();
        self.cli
            .push(&PushRequest {
                app_name: self.identity.app_name(),
                domain: &self.settings.domain,
                subdomain: self.identity.subdomain(),
                artifact: &artifact,
                disk_quota: &self.settings.disk_quota,
                memory: &self.settings.memory,
                buildpack: &buildpack,
            })
            .await?;

        create_app_services(&self.settings.create_services_script, self.app_name()).await?;

        let guid = self.cli.app_guid(self.app_name()).await?;
        if guid.is_empty() {
            return Err(CfRunnerError::EmptyGuid {
                app: self.app_name().to_owned(),
            });
        }
        debug!(app = self.app_name(), %guid, "resolved app guid");

        let environment = merge_environment(&self.settings.password, overrides);
        let body = update_body(&environment).map_err(|source| CfRunnerError::Payload {
            app: self.app_name().to_owned(),
            source,
        })?;
        self.cli.curl_put(&app_resource_path(&guid), &body).await?;
        info!(
            app = self.app_name(),
            variables = environment.len(),
            "app environment updated"
        );

        Ok(())
    }

    async fn fetch_package(&mut self, package_name: &str) -> Result<PathBuf, CfRunnerError> {
        let workspace = match self.workspace.take() {
            Some(workspace) => workspace,
            None => FixtureWorkspace::create(self.identity.app_id())?,
        };
        let dest = workspace.artifact_path(self.identity.app_id(), package_name);
        self.workspace = Some(workspace);

        let url = self.settings.package_url(package_name);
        download_package(&self.http, &url, &dest).await?;
        Ok(dest)
    }

    /// Start the pushed app; recent logs are emitted if the start fails.
    pub async fn start(&self) -> Result<(), CfRunnerError> {
        info!(app = self.app_name(), "starting app");
        if let Err(err) = self.cli.start(self.app_name()).await {
            warn!(app = self.app_name(), error = %err, "cf start failed; fetching recent logs");
            dump_recent_logs(&self.cli, self.app_name()).await;
            return Err(err.into());
        }

        info!(app = self.app_name(), "app started");
        Ok(())
    }

    /// Delete the app. Always issues the delete script, even when setup never
    /// ran, and disarms the drop guard.
    pub async fn teardown(&mut self) -> Result<(), CfRunnerError> {
        let cleanup = match self.cleanup.take() {
            Some(cleanup) => cleanup,
            None => self.cleanup_guard(),
        };
        let result = cleanup.run().await;
        self.release_workspace();
        result.map_err(Into::into)
    }

    /// GET `<scheme>://<hostname><path>` and require `expected_status`.
    pub async fn assert_app_running(
        &self,
        hostname: &str,
        path: &str,
        expected_status: u16,
    ) -> Result<(), CfRunnerError> {
        let url = app_url(&self.settings.app_scheme, hostname, path);
        expect_status(&self.http, &url, expected_status).await?;
        Ok(())
    }

    /// `assert_app_running` against `/xas/`, which answers 401 when the
    /// runtime is up.
    pub async fn assert_app_running_with_defaults(
        &self,
        hostname: &str,
    ) -> Result<(), CfRunnerError> {
        self.assert_app_running(hostname, DEFAULT_PROBE_PATH, DEFAULT_PROBE_STATUS)
            .await
    }

    pub async fn assert_string_in_recent_logs(
        &self,
        hostname: &str,
        substring: &str,
    ) -> Result<(), CfRunnerError> {
        let logs = self.recent_logs_for(hostname).await?;
        if logs_contain(&logs, substring) {
            debug!(app = hostname, substring, "found substring in recent logs");
            return Ok(());
        }

        emit_logs(hostname, &logs);
        Err(CfRunnerError::SubstringNotInLogs {
            app: hostname.to_owned(),
            substring: substring.to_owned(),
            logs,
        })
    }

    /// Recent logs of this fixture's app.
    pub async fn recent_logs(&self) -> Result<String, CfRunnerError> {
        self.recent_logs_for(self.app_name()).await
    }

    pub async fn recent_logs_for(&self, app_name: &str) -> Result<String, CfRunnerError> {
        Ok(self.cli.recent_logs(app_name).await?)
    }

    fn cleanup_guard(&self) -> DeploymentCleanup {
        DeploymentCleanup::new(
            self.settings.delete_app_script.clone(),
            self.app_name().to_owned(),
            self.settings.preserve,
        )
    }

    fn release_workspace(&mut self) {
        let Some(workspace) = self.workspace.take() else {
            return;
        };

        if self.settings.preserve {
            let path = workspace.persist();
            info!(path = %path.display(), "preserving fixture workspace");
        }
    }
}

impl Drop for CfFixture {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            warn!(app = self.app_name(), "fixture dropped without teardown; cleaning up");
            Box::new(cleanup).cleanup();
        }
        self.release_workspace();
    }
}
