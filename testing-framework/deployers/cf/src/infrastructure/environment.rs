use std::collections::BTreeMap;

use serde::Serialize;

/// Environment variables applied to a deployed app, keyed by name.
pub type EnvironmentMap = BTreeMap<String, String>;

#[derive(Serialize)]
struct EnvironmentUpdate<'a> {
    environment_json: &'a EnvironmentMap,
}

/// Variables every fixture deployment starts from.
#[must_use]
pub fn base_environment(password: &str) -> EnvironmentMap {
    [
        ("ADMIN_PASSWORD", password),
        ("DEBUGGER_PASSWORD", password),
        ("DEVELOPMENT_MODE", "true"),
        ("S3_USE_SSE", "true"),
        ("USE_DATA_SNAPSHOT", "true"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect()
}

/// Base environment with `overrides` applied on top; overrides win.
#[must_use]
pub fn merge_environment<I>(password: &str, overrides: I) -> EnvironmentMap
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut environment = base_environment(password);
    environment.extend(overrides);
    environment
}

/// JSON body for `PUT /v2/apps/<guid>`.
pub fn update_body(environment: &EnvironmentMap) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvironmentUpdate {
        environment_json: environment,
    })
}

#[must_use]
pub fn app_resource_path(guid: &str) -> String {
    format!("/v2/apps/{guid}")
}
