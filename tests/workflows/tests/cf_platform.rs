use std::env;

use serial_test::serial;
use testing_framework_core::init_test_tracing;
use testing_framework_runner_cf::CfFixture;

const DEFAULT_PACKAGE: &str = "BuildpackTestApp-mx-7-16.mda";
const DEFAULT_LOG_LINE: &str = "Mendix Runtime is now operational";

#[tokio::test]
#[serial]
#[ignore = "requires a logged-in cf CLI, CF_DOMAIN and the service scripts"]
async fn cf_platform_push_start_and_verify() -> anyhow::Result<()> {
    init_test_tracing();
    let package = env::var("CF_TEST_PACKAGE").unwrap_or_else(|_| DEFAULT_PACKAGE.to_owned());
    let log_line = env::var("CF_TEST_LOG_LINE").unwrap_or_else(|_| DEFAULT_LOG_LINE.to_owned());

    let mut fixture = CfFixture::from_env()?;
    println!("deploying {package} as {}", fixture.app_name());

    fixture.setup(&package).await?;
    fixture.start().await?;

    let app = fixture.app_name().to_owned();
    fixture.assert_app_running_with_defaults(&app).await?;
    fixture.assert_string_in_recent_logs(&app, &log_line).await?;

    fixture.teardown().await?;
    Ok(())
}
