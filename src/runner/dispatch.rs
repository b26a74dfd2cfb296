//! One-shot case dispatch for a single class run.
//!
//! The runner hands the lifecycle a `ClassExecution` wrapping the ordered
//! pending cases. The lifecycle may invoke `run_cases` at most once per
//! class run; invoking it again is a misuse of the engine contract and is
//! detected synchronously at the second call site. A lifecycle that never
//! invokes it at all is valid: the untouched cases are reported as skipped.

use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::{bail, Result};

use crate::models::case::{Case, CaseStatus};
use crate::models::failure::CapturedFailure;

/// Dispatch state for one class run: the ordered execute-set cases and the
/// one-shot consumption flag. Created by the runner, handed to the
/// lifecycle's `execute`, and discarded when that call returns.
pub struct ClassExecution<'a> {
    class: String,
    lifecycle: String,
    cases: &'a mut [Case],
    consumed: bool,
    reentry: Option<String>,
}

impl<'a> ClassExecution<'a> {
    pub(crate) fn new(class: &str, lifecycle: &str, cases: &'a mut [Case]) -> Self {
        Self {
            class: class.to_string(),
            lifecycle: lifecycle.to_string(),
            cases,
            consumed: false,
            reentry: None,
        }
    }

    /// Run the per-case action over every pending case, in order.
    ///
    /// The action is lifecycle-defined user code responsible for
    /// construction, execution, and disposal around each case. An error or
    /// panic escaping the action is attributed to the case that was active
    /// when it happened, unless that case already captured a failure from
    /// its own invocation (the earlier failure wins) or was skipped by the
    /// action (the skip stands). Dispatch always continues with the next
    /// case.
    ///
    /// Cases that failed at creation are reported-only; they are never
    /// handed to the action.
    ///
    /// # Errors
    /// Fails on the second and any later call within the same class run,
    /// naming the lifecycle and the class. The runner independently checks
    /// for this misuse after the lifecycle returns, so swallowing the error
    /// does not hide it.
    pub fn run_cases<F>(&mut self, mut action: F) -> Result<()>
    where
        F: FnMut(&mut Case) -> Result<()>,
    {
        if self.consumed {
            let message = format!(
                "{} attempted to run {}'s test cases multiple times, which is not supported.",
                self.lifecycle, self.class
            );
            self.reentry = Some(message.clone());
            bail!(message);
        }
        self.consumed = true;

        for case in self.cases.iter_mut() {
            if case.has_creation_failure() {
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| action(&mut *case)));
            let collateral = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(error)) => Some(CapturedFailure::new(error)),
                Err(payload) => Some(CapturedFailure::from_panic(payload)),
            };

            if let Some(failure) = collateral {
                if case.status() != CaseStatus::Skipped && case.failure().is_none() {
                    case.fail(failure);
                }
            }
        }

        Ok(())
    }

    /// The recorded misuse message, if `run_cases` was invoked more than
    /// once during this class run.
    pub(crate) fn reentry(&self) -> Option<&str> {
        self.reentry.as_deref()
    }
}
