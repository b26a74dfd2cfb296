//! A single schedulable test case and its execution state.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::invoke;
use crate::models::class::Operation;
use crate::models::failure::CapturedFailure;

/// Execution status of a case.
///
/// State machine transitions, driven only by the lifecycle that dispatches
/// the case:
/// - `Pending` → `Executed` (any number of `execute` calls)
/// - `Pending` → `Skipped` (one `skip` call)
/// - A case never moves between `Skipped` and `Executed`; the runner
///   guarantees the two are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    /// Never dispatched; reported as skipped if the lifecycle leaves it here.
    Pending,

    /// Deliberately not run, optionally with a reason.
    Skipped,

    /// Invoked at least once; the latest invocation decides pass or fail.
    Executed,
}

/// One schedulable unit of work: a class, an operation, and a fixed argument
/// list, plus the mutable state the lifecycle drives during a class run.
///
/// A case may be executed zero, one, or many times before the class run
/// completes; the engine imposes no cap, and only the outcome of the last
/// invocation is reported. Whatever state the case holds when the lifecycle
/// returns is final.
#[derive(Debug)]
pub struct Case {
    class: String,
    operation: Arc<Operation>,
    arguments: Vec<Value>,
    status: CaseStatus,
    failure: Option<CapturedFailure>,
    skip_reason: Option<String>,
    duration: Duration,
    creation_failed: bool,
}

impl Case {
    pub fn new(class: impl Into<String>, operation: Arc<Operation>, arguments: Vec<Value>) -> Self {
        Self {
            class: class.into(),
            operation,
            arguments,
            status: CaseStatus::Pending,
            failure: None,
            skip_reason: None,
            duration: Duration::ZERO,
            creation_failed: false,
        }
    }

    /// Create a case that failed before it could be dispatched, e.g. because
    /// its parameter source raised while producing arguments. Such a case is
    /// reported as failed but never handed to the per-case action.
    pub fn failed_at_creation(
        class: impl Into<String>,
        operation: Arc<Operation>,
        failure: CapturedFailure,
    ) -> Self {
        let mut case = Self::new(class, operation, Vec::new());
        case.status = CaseStatus::Executed;
        case.failure = Some(failure);
        case.creation_failed = true;
        case
    }

    /// Invoke the operation against the given instance.
    ///
    /// Each call marks the case executed, records this invocation's
    /// wall-clock duration, and replaces the captured failure with this
    /// invocation's outcome: a later success erases a prior failure, and a
    /// later failure overwrites a prior success.
    pub fn execute(&mut self, instance: &mut dyn Any) {
        let started = Instant::now();
        let outcome = invoke::execute(&self.operation, instance, &self.arguments);

        self.duration = started.elapsed();
        self.status = CaseStatus::Executed;
        self.failure = outcome.err();
    }

    /// Mark the case skipped with an optional reason.
    pub fn skip(&mut self, reason: Option<String>) {
        self.status = CaseStatus::Skipped;
        self.skip_reason = reason;
    }

    /// Mark the case executed-and-failed with the given failure, without
    /// invoking the operation. Used for failures that belong to the case but
    /// happened outside its own body: parameter generation, per-case setup
    /// or teardown, instance disposal.
    pub fn fail(&mut self, failure: CapturedFailure) {
        self.status = CaseStatus::Executed;
        self.failure = Some(failure);
    }

    /// The identity reported to listeners: `Class.operation`, with the
    /// argument list appended when the case is parameterized.
    pub fn name(&self) -> String {
        if self.arguments.is_empty() {
            format!("{}.{}", self.class, self.operation.name())
        } else {
            let arguments: Vec<String> = self.arguments.iter().map(Value::to_string).collect();
            format!("{}.{}({})", self.class, self.operation.name(), arguments.join(", "))
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn operation_name(&self) -> &str {
        self.operation.name()
    }

    /// Metadata tags of the underlying operation, opaque to the engine.
    pub fn tags(&self) -> &[String] {
        self.operation.tags()
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn status(&self) -> CaseStatus {
        self.status
    }

    pub fn failure(&self) -> Option<&CapturedFailure> {
        self.failure.as_ref()
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    /// Wall-clock duration of the most recent invocation.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn has_creation_failure(&self) -> bool {
        self.creation_failed
    }
}
