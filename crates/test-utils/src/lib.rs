//! Shared fakes and builders for pagecheck's integration tests.

pub mod builders;
pub mod fakes;

use std::sync::Once;
use std::time::Duration;

use pagecheck::logging::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Output only shows up for failing tests (or with `--nocapture`). The filter
/// comes from `PAGECHECK_LOG`, falling back to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if `f` does not finish within five seconds, so a stuck
/// fetch shows up as a failure instead of a hung test run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("check run did not finish within 5 seconds")
}
