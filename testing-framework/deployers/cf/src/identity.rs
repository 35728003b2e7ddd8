use testing_framework_config::constants::{APP_ID_LEN, SUBDOMAIN_PREFIX};
use uuid::Uuid;

/// Random per-fixture name of the deployed app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppIdentity {
    app_id: String,
    subdomain: String,
    app_name: String,
}

impl AppIdentity {
    /// Generate a fresh identity routed under `domain`.
    #[must_use]
    pub fn generate(domain: &str) -> Self {
        let mut app_id = Uuid::new_v4().simple().to_string();
        app_id.truncate(APP_ID_LEN);
        Self::from_app_id(app_id, domain)
    }

    #[must_use]
    pub fn from_app_id(app_id: impl Into<String>, domain: &str) -> Self {
        let app_id = app_id.into();
        let subdomain = format!("{SUBDOMAIN_PREFIX}{app_id}");
        let app_name = format!("{subdomain}.{domain}");
        Self {
            app_id,
            subdomain,
            app_name,
        }
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    #[must_use]
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// App name, which is also the fully-qualified hostname.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.app_name
    }
}
