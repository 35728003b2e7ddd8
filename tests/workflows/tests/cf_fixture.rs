use std::{env, fs};

use serial_test::serial;
use testing_framework_core::init_test_tracing;
use testing_framework_runner_cf::{
    ArtifactError, CfFixture, CfRunnerError, CliError, HttpProbeError,
    SettingsError,
};
use tests_workflows::{
    BRANCH, DEFAULT_GUID, DOMAIN, FakeCloudFoundry, LocalPlatform, PACKAGE_NAME,
};

const APP_ID: &str = "1a2b3c4d";
const APP_NAME: &str = "ops-1a2b3c4d.apps.test";

fn fixture(fake: &FakeCloudFoundry, platform: &LocalPlatform) -> CfFixture {
    let settings = fake
        .settings()
        .with_package_base_url(platform.package_base_url());
    CfFixture::with_app_id(settings, APP_ID)
}

fn preserving_fixture(fake: &FakeCloudFoundry, platform: &LocalPlatform) -> CfFixture {
    let settings = fake
        .settings()
        .with_package_base_url(platform.package_base_url())
        .with_preserve(true);
    CfFixture::with_app_id(settings, APP_ID)
}

#[tokio::test]
#[serial]
async fn setup_start_and_teardown_run_in_order() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = fixture(&fake, &platform);

    fixture.setup(PACKAGE_NAME).await?;
    fixture.start().await?;
    fixture
        .assert_app_running_with_defaults(&platform.host())
        .await?;
    fixture.teardown().await?;

    let calls = fake.invocations()?;
    assert_eq!(calls.len(), 6, "unexpected invocations: {calls:#?}");

    let push = &calls[0];
    assert!(push.starts_with(&format!("cf push {APP_NAME} -d {DOMAIN} -p ")));
    assert!(push.contains(&format!("{APP_ID}{PACKAGE_NAME}")));
    assert!(push.ends_with(&format!(
        "-n ops-{APP_ID} --no-start -k 3G -m 2G -b https://github.com/mendix/cf-mendix-buildpack.git#{BRANCH}"
    )));

    assert_eq!(calls[1], format!("create-app-services {APP_NAME}"));
    assert_eq!(calls[2], format!("cf app {APP_NAME} --guid"));
    assert!(calls[3].starts_with(&format!("cf curl -X PUT /v2/apps/{DEFAULT_GUID} -d ")));
    assert_eq!(calls[4], format!("cf start {APP_NAME}"));
    assert_eq!(calls[5], format!("delete-app {APP_NAME}"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn push_failure_tears_down_the_same_app() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    fake.fail("push")?;
    let mut fixture = fixture(&fake, &platform);

    let err = fixture
        .setup(PACKAGE_NAME)
        .await
        .expect_err("push is scripted to fail");
    assert!(matches!(err, CfRunnerError::Cli(CliError::Failed { .. })), "{err}");

    let calls = fake.invocations()?;
    assert_eq!(calls.len(), 2, "unexpected invocations: {calls:#?}");
    assert!(calls[0].starts_with(&format!("cf push {APP_NAME}")));
    assert_eq!(calls[1], format!("delete-app {APP_NAME}"));
    Ok(())
}

#[tokio::test]
#[serial]
async fn download_failure_tears_down_before_returning() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = fixture(&fake, &platform);

    let err = fixture
        .setup("missing.mpk")
        .await
        .expect_err("package is not served");
    assert!(
        matches!(
            err,
            CfRunnerError::Artifact(ArtifactError::Status { status: 404, .. })
        ),
        "{err}"
    );

    assert_eq!(fake.invocations()?, [format!("delete-app {APP_NAME}")]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn service_script_failure_tears_down() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    fake.fail("create-app-services")?;
    let mut fixture = fixture(&fake, &platform);

    fixture
        .setup(PACKAGE_NAME)
        .await
        .expect_err("service script is scripted to fail");

    let calls = fake.invocations()?;
    assert_eq!(
        calls.last().map(String::as_str),
        Some(format!("delete-app {APP_NAME}").as_str())
    );
    assert!(!calls.iter().any(|call| call.starts_with("cf curl")));
    Ok(())
}

#[tokio::test]
#[serial]
async fn empty_guid_aborts_setup() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    fake.set_guid("   \n")?;
    let mut fixture = fixture(&fake, &platform);

    let err = fixture
        .setup(PACKAGE_NAME)
        .await
        .expect_err("guid is blank");
    assert!(matches!(err, CfRunnerError::EmptyGuid { ref app } if app == APP_NAME));

    let calls = fake.invocations()?;
    assert!(!calls.iter().any(|call| call.starts_with("cf curl")));
    assert_eq!(
        calls.last().map(String::as_str),
        Some(format!("delete-app {APP_NAME}").as_str())
    );
    Ok(())
}

#[tokio::test]
#[serial]
async fn environment_overrides_win_over_defaults() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let settings = fake
        .settings()
        .with_package_base_url(platform.package_base_url())
        .with_password("hunter2");
    let mut fixture = CfFixture::with_app_id(settings, APP_ID);

    fixture
        .setup_with_env(
            PACKAGE_NAME,
            [
                ("DEVELOPMENT_MODE", "false"),
                ("MXRUNTIME_DatabaseType", "HSQLDB"),
            ],
        )
        .await?;

    let payload = fake.payload()?.expect("cf curl received a body");
    let environment = &payload["environment_json"];
    assert_eq!(environment["DEVELOPMENT_MODE"], "false");
    assert_eq!(environment["MXRUNTIME_DatabaseType"], "HSQLDB");
    assert_eq!(environment["ADMIN_PASSWORD"], "hunter2");
    assert_eq!(environment["DEBUGGER_PASSWORD"], "hunter2");
    assert_eq!(environment["S3_USE_SSE"], "true");
    assert_eq!(environment["USE_DATA_SNAPSHOT"], "true");

    fixture.teardown().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn start_failure_fetches_recent_logs() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = fixture(&fake, &platform);
    fixture.setup(PACKAGE_NAME).await?;

    fake.fail("start")?;
    fake.set_recent_logs("ERR database unreachable\n")?;
    let err = fixture.start().await.expect_err("start is scripted to fail");
    assert!(matches!(err, CfRunnerError::Cli(CliError::Failed { .. })), "{err}");

    let calls = fake.invocations()?;
    let start = calls
        .iter()
        .position(|call| call == &format!("cf start {APP_NAME}"))
        .expect("cf start issued");
    assert_eq!(calls[start + 1], format!("cf logs {APP_NAME} --recent"));

    fixture.teardown().await?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn log_assertion_matches_anywhere_in_output() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    fake.set_recent_logs("Mendix runtime starting\nRuntime successfully started\n")?;
    let fixture = fixture(&fake, &platform);

    let hostname = fixture.identity().hostname().to_owned();
    assert_eq!(hostname, APP_NAME);

    fixture
        .assert_string_in_recent_logs(&hostname, "Mendix runtime")
        .await?;
    fixture
        .assert_string_in_recent_logs(APP_NAME, "successfully started")
        .await?;

    let err = fixture
        .assert_string_in_recent_logs(APP_NAME, "license expired")
        .await
        .expect_err("substring is absent");
    match err {
        CfRunnerError::SubstringNotInLogs {
            app,
            substring,
            logs,
        } => {
            assert_eq!(app, APP_NAME);
            assert_eq!(substring, "license expired");
            assert!(logs.contains("Runtime successfully started"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(fixture.recent_logs().await?.lines().count(), 2);
    Ok(())
}

#[tokio::test]
#[serial]
async fn unexpected_status_fails_app_assertion() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let fixture = fixture(&fake, &platform);

    fixture
        .assert_app_running(&platform.host(), "/health", 200)
        .await?;

    let err = fixture
        .assert_app_running(&platform.host(), "/xas/", 200)
        .await
        .expect_err("/xas/ answers 401");
    assert!(
        matches!(
            err,
            CfRunnerError::Http(HttpProbeError::UnexpectedStatus {
                expected: 200,
                actual: 401,
                ..
            })
        ),
        "{err}"
    );
    Ok(())
}

#[tokio::test]
#[serial]
async fn dropping_fixture_after_setup_deletes_app() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = fixture(&fake, &platform);
    fixture.setup(PACKAGE_NAME).await?;
    let root = fixture
        .workspace_root()
        .expect("setup created a workspace")
        .to_path_buf();

    drop(fixture);

    let calls = fake.invocations()?;
    assert_eq!(
        calls.last().map(String::as_str),
        Some(format!("delete-app {APP_NAME}").as_str())
    );
    assert!(!root.exists());
    Ok(())
}

#[tokio::test]
#[serial]
async fn teardown_disarms_drop_cleanup() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = fixture(&fake, &platform);
    fixture.setup(PACKAGE_NAME).await?;
    fixture.teardown().await?;
    drop(fixture);

    let deletes = fake
        .invocations()?
        .into_iter()
        .filter(|call| call.starts_with("delete-app"))
        .count();
    assert_eq!(deletes, 1);
    Ok(())
}

#[tokio::test]
#[serial]
async fn teardown_removes_workspace() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = fixture(&fake, &platform);

    fixture.setup(PACKAGE_NAME).await?;
    let root = fixture
        .workspace_root()
        .expect("setup created a workspace")
        .to_path_buf();
    assert!(root.join(format!("{APP_ID}{PACKAGE_NAME}")).is_file());
    assert!(
        root.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&format!("cf-fixture-{APP_ID}-")))
    );

    fixture.teardown().await?;
    assert!(fixture.workspace_root().is_none());
    assert!(!root.exists());
    Ok(())
}

#[tokio::test]
#[serial]
async fn preserve_keeps_app_and_workspace_after_teardown() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = preserving_fixture(&fake, &platform);

    fixture.setup(PACKAGE_NAME).await?;
    let root = fixture
        .workspace_root()
        .expect("setup created a workspace")
        .to_path_buf();
    fixture.teardown().await?;

    assert!(
        !fake
            .invocations()?
            .iter()
            .any(|call| call.starts_with("delete-app"))
    );
    assert!(root.join(format!("{APP_ID}{PACKAGE_NAME}")).is_file());
    fs::remove_dir_all(&root)?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn preserve_skips_deletion_on_drop() -> anyhow::Result<()> {
    init_test_tracing();
    let fake = FakeCloudFoundry::install()?;
    let platform = LocalPlatform::spawn().await?;
    let mut fixture = preserving_fixture(&fake, &platform);

    fixture.setup(PACKAGE_NAME).await?;
    let root = fixture
        .workspace_root()
        .expect("setup created a workspace")
        .to_path_buf();
    drop(fixture);

    assert!(
        !fake
            .invocations()?
            .iter()
            .any(|call| call.starts_with("delete-app"))
    );
    assert!(root.exists());
    fs::remove_dir_all(&root)?;
    Ok(())
}

#[tokio::test]
#[serial]
async fn missing_domain_fails_construction() {
    // SAFETY: env-mutating tests are serialised.
    unsafe { env::remove_var("CF_DOMAIN") };

    let result = CfFixture::from_env();
    assert!(matches!(
        result,
        Err(CfRunnerError::Settings(SettingsError::MissingDomain))
    ));
}

#[tokio::test]
#[serial]
async fn generated_identities_are_unique_per_fixture() {
    let fake = FakeCloudFoundry::install().expect("fake cf");
    let first = CfFixture::new(fake.settings());
    let second = CfFixture::new(fake.settings());

    assert_ne!(first.app_name(), second.app_name());
    assert!(first.app_name().starts_with("ops-"));
    assert!(first.app_name().ends_with(&format!(".{DOMAIN}")));
}
