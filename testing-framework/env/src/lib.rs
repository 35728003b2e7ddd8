use std::{env, path::PathBuf};

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

#[must_use]
pub fn cf_domain() -> Option<String> {
    non_empty("CF_DOMAIN")
}

#[must_use]
pub fn travis_branch() -> Option<String> {
    non_empty("TRAVIS_BRANCH")
}

#[must_use]
pub fn mx_password() -> Option<String> {
    env::var("MX_PASSWORD").ok()
}

#[must_use]
pub fn package_url() -> Option<String> {
    non_empty("PACKAGE_URL")
}

#[must_use]
pub fn cf_cli_bin() -> Option<PathBuf> {
    non_empty("CF_CLI_BIN").map(PathBuf::from)
}

#[must_use]
pub fn cf_create_services_script() -> Option<PathBuf> {
    non_empty("CF_CREATE_SERVICES_SCRIPT").map(PathBuf::from)
}

#[must_use]
pub fn cf_delete_app_script() -> Option<PathBuf> {
    non_empty("CF_DELETE_APP_SCRIPT").map(PathBuf::from)
}

#[must_use]
pub fn cf_app_scheme() -> Option<String> {
    non_empty("CF_APP_SCHEME")
}

#[must_use]
pub fn cf_runner_preserve() -> bool {
    env::var("CF_RUNNER_PRESERVE").is_ok()
}

#[must_use]
pub fn debug_tracing() -> bool {
    env::var("CF_TESTS_TRACING").is_ok_and(|val| val.eq_ignore_ascii_case("true"))
}

#[must_use]
pub fn rust_log() -> Option<String> {
    env::var("RUST_LOG").ok()
}
