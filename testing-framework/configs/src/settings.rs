use std::{path::PathBuf, process::Command};

use testing_framework_env as tf_env;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_APP_SCHEME, DEFAULT_BUILDPACK_REPO, DEFAULT_CF_CLI, DEFAULT_CREATE_SERVICES_SCRIPT,
    DEFAULT_DELETE_APP_SCRIPT, DEFAULT_DISK_QUOTA, DEFAULT_MEMORY, DEFAULT_MX_PASSWORD,
    DEFAULT_PACKAGE_BASE_URL, FALLBACK_BRANCH,
};

/// Failures while resolving fixture settings from the environment.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("CF_DOMAIN must be set to the platform domain apps are routed under")]
    MissingDomain,
}

/// Everything a fixture needs to push, configure and delete one app.
#[derive(Clone, Debug)]
pub struct FixtureSettings {
    pub domain: String,
    pub branch: String,
    pub password: String,
    pub package_base_url: String,
    pub package_url_override: Option<String>,
    pub buildpack_repo: String,
    pub disk_quota: String,
    pub memory: String,
    pub cf_cli: PathBuf,
    pub create_services_script: PathBuf,
    pub delete_app_script: PathBuf,
    pub app_scheme: String,
    pub preserve: bool,
}

impl FixtureSettings {
    /// Settings for `domain` with every other knob at its default.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            branch: FALLBACK_BRANCH.to_owned(),
            password: DEFAULT_MX_PASSWORD.to_owned(),
            package_base_url: DEFAULT_PACKAGE_BASE_URL.to_owned(),
            package_url_override: None,
            buildpack_repo: DEFAULT_BUILDPACK_REPO.to_owned(),
            disk_quota: DEFAULT_DISK_QUOTA.to_owned(),
            memory: DEFAULT_MEMORY.to_owned(),
            cf_cli: PathBuf::from(DEFAULT_CF_CLI),
            create_services_script: PathBuf::from(DEFAULT_CREATE_SERVICES_SCRIPT),
            delete_app_script: PathBuf::from(DEFAULT_DELETE_APP_SCRIPT),
            app_scheme: DEFAULT_APP_SCHEME.to_owned(),
            preserve: false,
        }
    }

    /// Resolve settings from the process environment.
    ///
    /// `CF_DOMAIN` is mandatory. The branch comes from `TRAVIS_BRANCH`, then
    /// from the checked-out git branch, then falls back to `master`.
    pub fn from_env() -> Result<Self, SettingsError> {
        let domain = tf_env::cf_domain().ok_or(SettingsError::MissingDomain)?;
        let mut settings = Self::new(domain);

        settings.branch = tf_env::travis_branch()
            .or_else(current_git_branch)
            .unwrap_or_else(|| FALLBACK_BRANCH.to_owned());

        if let Some(password) = tf_env::mx_password() {
            settings.password = password;
        }
        settings.package_url_override = tf_env::package_url();
        if let Some(cli) = tf_env::cf_cli_bin() {
            settings.cf_cli = cli;
        }
        if let Some(script) = tf_env::cf_create_services_script() {
            settings.create_services_script = script;
        }
        if let Some(script) = tf_env::cf_delete_app_script() {
            settings.delete_app_script = script;
        }
        if let Some(scheme) = tf_env::cf_app_scheme() {
            settings.app_scheme = scheme;
        }
        settings.preserve = tf_env::cf_runner_preserve();

        debug!(
            domain = %settings.domain,
            branch = %settings.branch,
            package_url_override = ?settings.package_url_override,
            cf_cli = %settings.cf_cli.display(),
            preserve = settings.preserve,
            "resolved fixture settings"
        );
        Ok(settings)
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_package_base_url(mut self, url: impl Into<String>) -> Self {
        self.package_base_url = url.into();
        self
    }

    /// Download every package from `url`, ignoring the package name.
    #[must_use]
    pub fn with_package_url(mut self, url: impl Into<String>) -> Self {
        self.package_url_override = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_buildpack_repo(mut self, repo: impl Into<String>) -> Self {
        self.buildpack_repo = repo.into();
        self
    }

    #[must_use]
    pub fn with_cf_cli(mut self, cli: impl Into<PathBuf>) -> Self {
        self.cf_cli = cli.into();
        self
    }

    #[must_use]
    pub fn with_scripts(
        mut self,
        create_services: impl Into<PathBuf>,
        delete_app: impl Into<PathBuf>,
    ) -> Self {
        self.create_services_script = create_services.into();
        self.delete_app_script = delete_app.into();
        self
    }

    #[must_use]
    pub fn with_app_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.app_scheme = scheme.into();
        self
    }

    /// Keep the deployment and downloaded artifacts after the fixture ends.
    #[must_use]
    pub const fn with_preserve(mut self, preserve: bool) -> Self {
        self.preserve = preserve;
        self
    }

    /// URL the named package is downloaded from.
    #[must_use]
    pub fn package_url(&self, package_name: &str) -> String {
        match &self.package_url_override {
            Some(url) => url.clone(),
            None => format!("{}{package_name}", self.package_base_url),
        }
    }

    /// Buildpack reference handed to `cf push -b`.
    #[must_use]
    pub fn buildpack_url(&self) -> String {
        format!("{}#{}", self.buildpack_repo, self.branch)
    }
}

fn current_git_branch() -> Option<String> {
    let output = match Command::new("git")
        .args(["rev-parse", "--symbolic-full-name", "--abbrev-ref", "HEAD"])
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            warn!(error = ?err, "failed to spawn git; using fallback branch");
            return None;
        }
    };

    if !output.status.success() {
        warn!(
            stderr = %String::from_utf8_lossy(&output.stderr),
            "git rev-parse failed; using fallback branch"
        );
        return None;
    }

    let branch = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!branch.is_empty()).then_some(branch)
}
