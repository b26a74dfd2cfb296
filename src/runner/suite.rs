//! Suite runner: a whole run across classes.

use chrono::Utc;
use tracing::info;

use crate::convention::Convention;
use crate::listener::Listener;
use crate::models::class::TestClass;
use crate::models::outcome::RunResult;
use crate::runner::core::ClassRunner;
use crate::runner::error::FatalError;

/// Runs classes in order, one at a time, aggregating class results into a
/// timestamped run result.
pub struct Runner<'a> {
    listener: &'a mut dyn Listener,
    convention: &'a Convention,
}

impl<'a> Runner<'a> {
    pub fn new(listener: &'a mut dyn Listener, convention: &'a Convention) -> Self {
        Self { listener, convention }
    }

    /// Run every class to completion, in order.
    ///
    /// # Errors
    /// The first [`FatalError`] aborts the run and propagates: a broken
    /// lifecycle invalidates the remainder of the run, so no further class
    /// is attempted.
    pub fn run(&mut self, classes: &[TestClass]) -> Result<RunResult, FatalError> {
        let started_at = Utc::now();
        info!(classes = classes.len(), "starting test run");

        let mut results = Vec::with_capacity(classes.len());
        for class in classes {
            let mut runner = ClassRunner::new(&mut *self.listener, self.convention);
            results.push(runner.run(class)?);
        }

        let run = RunResult::new(results, started_at, Utc::now());
        info!(
            run = %run.id,
            passed = run.passed(),
            failed = run.failed(),
            skipped = run.skipped(),
            "test run complete"
        );

        Ok(run)
    }
}
