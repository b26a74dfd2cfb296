//! Lifecycle boundary: caller-supplied strategies that drive case execution.
//!
//! A lifecycle controls instance construction, per-case setup/teardown, and
//! disposal around the cases of one class run. The engine calls exactly one
//! operation, `execute`, handing it the class descriptor and the one-shot
//! case dispatcher; the construction strategy and any retries or
//! dispatch-time skips are the lifecycle's choice.

use anyhow::Result;

use crate::models::class::TestClass;
use crate::runner::dispatch::ClassExecution;

pub trait Lifecycle {
    /// Drive one class run.
    ///
    /// Call `cases.run_cases(..)` at most once to dispatch the pending
    /// cases; never calling it is valid and leaves every case reported as
    /// skipped. Any error escaping this method (as opposed to an error
    /// inside a per-case action) aborts the class run as fatal.
    fn execute(&self, class: &TestClass, cases: &mut ClassExecution<'_>) -> Result<()>;

    /// Readable identity used in diagnostics; defaults to the implementing
    /// type's path.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Construct a fresh instance for every case: construct, execute, dispose.
///
/// The default lifecycle. A construction failure is attributed to the case
/// being dispatched and the run moves on to the next case.
pub struct InstancePerCase;

impl Lifecycle for InstancePerCase {
    fn execute(&self, class: &TestClass, cases: &mut ClassExecution<'_>) -> Result<()> {
        cases.run_cases(|case| {
            let mut instance = class.construct()?;
            case.execute(instance.as_mut());
            drop(instance);
            Ok(())
        })
    }
}

/// Construct one shared instance for the whole class run.
///
/// Construction happens before dispatch and disposal after, so a failure in
/// either is fatal to the class run rather than attributable to any single
/// case.
pub struct InstancePerClass;

impl Lifecycle for InstancePerClass {
    fn execute(&self, class: &TestClass, cases: &mut ClassExecution<'_>) -> Result<()> {
        let mut instance = class.construct()?;

        cases.run_cases(|case| {
            case.execute(instance.as_mut());
            Ok(())
        })?;

        drop(instance);
        Ok(())
    }
}
