//! Invocation adapter: execute one operation on one instance.
//!
//! All failure shapes an operation can produce (a returned error, a panic,
//! a rejected declaration) are normalized into a single `CapturedFailure`
//! before the case records them, so reporting never depends on how user code
//! happened to fail.

pub mod block;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::Result;
use serde_json::Value;

use crate::models::class::{Operation, OperationBody};
use crate::models::failure::CapturedFailure;

/// Execute `operation` against `instance` with the given arguments.
///
/// Declared-shape problems are rejected before invocation:
/// - an operation with unresolved generic type parameters is never attempted;
/// - a detached asynchronous operation (no awaitable handle) is never
///   attempted, since its completion could not be observed.
///
/// Otherwise the body runs on the calling thread. Asynchronous bodies are
/// awaited to completion via [`block::await_blocking`] before this function
/// returns. Panics are unwrapped to the user's original message; returned
/// errors are wrapped as-is. A value-carrying result is returned as
/// `Some(value)`, a value-less one as `None`.
///
/// No retries happen at this layer, and no side effects occur beyond the
/// user code itself.
pub fn execute(
    operation: &Operation,
    instance: &mut dyn Any,
    arguments: &[Value],
) -> Result<Option<Value>, CapturedFailure> {
    if operation.has_unresolved_type_params() {
        return Err(CapturedFailure::from_message(format!(
            "could not resolve type parameters for generic operation '{}'",
            operation.name()
        )));
    }

    match operation.body() {
        OperationBody::Detached(_) => Err(CapturedFailure::from_message(format!(
            "detached async operations are not supported: declare '{}' to return a future \
             so the runner can await its completion",
            operation.name()
        ))),
        OperationBody::Sync(call) => {
            normalize(catch_unwind(AssertUnwindSafe(|| call(instance, arguments))))
        }
        OperationBody::Async(start) => normalize(catch_unwind(AssertUnwindSafe(|| {
            let future = start(instance, arguments);
            block::await_blocking(future)?
        }))),
    }
}

fn normalize(
    outcome: std::thread::Result<Result<Option<Value>>>,
) -> Result<Option<Value>, CapturedFailure> {
    match outcome {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(CapturedFailure::new(error)),
        Err(payload) => Err(CapturedFailure::from_panic(payload)),
    }
}
