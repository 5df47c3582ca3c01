//! Self-test entry point
//!
//! Runs the built-in suite against this build and exits with status 1 if
//! any case fails. Settings come from `eventtest.toml` in the working
//! directory, or the file named by `EVENTTEST_CONFIG`. `RUST_LOG` overrides
//! the configured log filter.

use eventtest_runner::{run_tests_with, self_test, RunnerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config_path = RunnerConfig::default_path();
    let config = RunnerConfig::load_or_default(&config_path)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.env_filter()?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        config = %config_path.display(),
        fail_fast = config.fail_fast,
        "eventtest self-test starting"
    );

    let summary = run_tests_with(self_test::suite(), &config);
    if !summary.is_success() {
        error!(
            failed = summary.failed,
            passed = summary.passed,
            "self-test failed"
        );
        std::process::exit(1);
    }
    info!(passed = summary.passed, "self-test passed");
    Ok(())
}
