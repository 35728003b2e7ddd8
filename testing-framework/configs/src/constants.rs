/// Password used for the admin and debugger accounts when `MX_PASSWORD` is
/// unset.
pub const DEFAULT_MX_PASSWORD: &str = "Y0l0lop13#123";

/// Location that package names are resolved against when `PACKAGE_URL` is
/// unset.
pub const DEFAULT_PACKAGE_BASE_URL: &str = "https://s3-eu-west-1.amazonaws.com/mx-ci-binaries/";

/// Buildpack repository pushed apps are staged with; the branch is appended
/// as a `#<branch>` fragment.
pub const DEFAULT_BUILDPACK_REPO: &str = "https://github.com/mendix/cf-mendix-buildpack.git";

/// Branch used when neither `TRAVIS_BRANCH` nor git can name one.
pub const FALLBACK_BRANCH: &str = "master";

/// Disk quota passed to `cf push -k`.
pub const DEFAULT_DISK_QUOTA: &str = "3G";

/// Memory limit passed to `cf push -m`.
pub const DEFAULT_MEMORY: &str = "2G";

/// Prefix of every generated subdomain.
pub const SUBDOMAIN_PREFIX: &str = "ops-";

/// Number of hex characters kept from the generated UUID.
pub const APP_ID_LEN: usize = 8;

/// Deployment CLI looked up on `PATH` when `CF_CLI_BIN` is unset.
pub const DEFAULT_CF_CLI: &str = "cf";

pub const DEFAULT_CREATE_SERVICES_SCRIPT: &str = "./create-app-services.sh";

pub const DEFAULT_DELETE_APP_SCRIPT: &str = "./delete-app.sh";

/// Scheme used to reach deployed apps.
pub const DEFAULT_APP_SCHEME: &str = "https";

/// Path probed by `assert_app_running` when the caller has no better one.
pub const DEFAULT_PROBE_PATH: &str = "/xas/";

/// Status the default probe path answers with on a running, unauthenticated
/// app.
pub const DEFAULT_PROBE_STATUS: u16 = 401;
