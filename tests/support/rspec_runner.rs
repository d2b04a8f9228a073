//! Runs the rspec behaviour suites against a brood app.

use rspec::block::Suite;
use rspec::report::Report;
use rspec::{ConfigurationBuilder, Logger, Runner};
use std::fmt::Debug;
use std::io;
use std::sync::Arc;

/// Runs every example of `suite` in declaration order on the calling thread.
///
/// The fixtures share one `SharedApp` per example, so examples must not
/// overlap. All examples run even after a failure; the test then fails with
/// the number of failed examples.
///
/// # Panics
/// Panics if rspec rejects the configuration or any example failed.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let logger = Arc::new(Logger::new(io::stdout()));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(
        report.is_success(),
        "{} rspec example(s) failed",
        report.get_failed()
    );
}
