//! Class runner: one class's full set of discovered cases, start to finish.
//!
//! The runner:
//! - Builds cases from the class's operations and the convention's
//!   parameter source
//! - Partitions them into skip and execute sets
//! - Reports skips immediately, independent of the lifecycle
//! - Hands the execute set to the configured lifecycle through a one-shot
//!   dispatch guard
//! - Reports pass/fail/skip outcomes once the lifecycle returns

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info};

use crate::convention::Convention;
use crate::listener::Listener;
use crate::models::case::{Case, CaseStatus};
use crate::models::class::TestClass;
use crate::models::failure::CapturedFailure;
use crate::models::outcome::{CaseOutcome, ClassResult};
use crate::runner::dispatch::ClassExecution;
use crate::runner::error::FatalError;

/// Runs one class's cases under a convention, reporting to a listener.
pub struct ClassRunner<'a> {
    listener: &'a mut dyn Listener,
    convention: &'a Convention,
}

impl<'a> ClassRunner<'a> {
    pub fn new(listener: &'a mut dyn Listener, convention: &'a Convention) -> Self {
        Self { listener, convention }
    }

    /// Run every discovered case of `class` and return the class result.
    ///
    /// Skipped cases are reported before any execution happens. Cases the
    /// lifecycle leaves untouched are reported as skipped, never as errors.
    ///
    /// # Errors
    /// Returns a [`FatalError`] when an error escapes the lifecycle's own
    /// body or the lifecycle misuses the dispatch contract. Fatal errors
    /// are never downgraded to per-case failures: their cause invalidates
    /// confidence in every case result for the class.
    pub fn run(&mut self, class: &TestClass) -> Result<ClassResult, FatalError> {
        let cases = self.discover_cases(class);
        debug!(class = class.name(), cases = cases.len(), "running test class");

        let (to_skip, mut to_execute): (Vec<Case>, Vec<Case>) = cases
            .into_iter()
            .partition(|case| self.convention.should_skip(case));

        let mut result = ClassResult::new(class.name());

        for case in &to_skip {
            let reason = self.convention.reason_for_skip(case);
            self.listener.case_skipped(case, reason.as_deref());
            result.add(CaseOutcome::skipped(case.name(), reason));
        }

        if !to_execute.is_empty() {
            self.convention.order_cases(&mut to_execute);
            self.run_lifecycle(class, &mut to_execute)?;

            for case in &to_execute {
                result.add(self.report(case));
            }
        }

        info!(
            class = class.name(),
            passed = result.passed(),
            failed = result.failed(),
            skipped = result.skipped(),
            "test class complete"
        );

        Ok(result)
    }

    /// Invoke the configured lifecycle exactly once over the execute set.
    ///
    /// The lifecycle runs inside a panic boundary so a panicking lifecycle
    /// body is observed the same way as a returned error: as a fatal
    /// failure. The dispatch guard's misuse flag is checked first, so a
    /// lifecycle that swallows the guard's error cannot mask a re-entry.
    fn run_lifecycle(&mut self, class: &TestClass, cases: &mut [Case]) -> Result<(), FatalError> {
        let lifecycle = self.convention.selected_lifecycle();
        let mut execution = ClassExecution::new(class.name(), &lifecycle.name(), cases);

        let outcome = catch_unwind(AssertUnwindSafe(|| lifecycle.execute(class, &mut execution)));

        if let Some(message) = execution.reentry() {
            return Err(FatalError::CasesRunMultipleTimes {
                message: message.to_string(),
            });
        }

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(FatalError::Lifecycle {
                lifecycle: lifecycle.name(),
                class: class.name().to_string(),
                source: error,
            }),
            Err(payload) => Err(FatalError::Lifecycle {
                lifecycle: lifecycle.name(),
                class: class.name().to_string(),
                source: CapturedFailure::from_panic(payload).into_cause(),
            }),
        }
    }

    fn report(&mut self, case: &Case) -> CaseOutcome {
        match case.status() {
            CaseStatus::Pending => {
                self.listener.case_skipped(case, None);
                CaseOutcome::skipped(case.name(), None)
            }
            CaseStatus::Skipped => {
                let reason = case.skip_reason().map(str::to_string);
                self.listener.case_skipped(case, reason.as_deref());
                CaseOutcome::skipped(case.name(), reason)
            }
            CaseStatus::Executed => match case.failure() {
                None => {
                    self.listener.case_passed(case, case.duration());
                    CaseOutcome::passed(case.name(), case.duration())
                }
                Some(failure) => {
                    self.listener.case_failed(case, case.duration(), failure);
                    CaseOutcome::failed(case.name(), case.duration(), failure.message())
                }
            },
        }
    }

    /// Build the case list: one case per argument list the parameter source
    /// yields, a single zero-argument case when it yields none, and a single
    /// creation-failed case when it raises. A failing source is case-local,
    /// never a run abort.
    fn discover_cases(&self, class: &TestClass) -> Vec<Case> {
        let mut cases = Vec::new();

        for operation in class.operations() {
            match self.convention.parameter_source().parameters(operation) {
                Ok(argument_lists) if argument_lists.is_empty() => {
                    cases.push(Case::new(class.name(), Arc::clone(operation), Vec::new()));
                }
                Ok(argument_lists) => {
                    for arguments in argument_lists {
                        cases.push(Case::new(class.name(), Arc::clone(operation), arguments));
                    }
                }
                Err(error) => {
                    cases.push(Case::failed_at_creation(
                        class.name(),
                        Arc::clone(operation),
                        CapturedFailure::new(error),
                    ));
                }
            }
        }

        cases
    }
}
