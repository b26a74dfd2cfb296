//! Normalized failure record attributed to a test case.

use std::any::Any;
use std::fmt;

use anyhow::anyhow;

/// A failure captured while running user code on behalf of a case.
///
/// Produced whenever instance construction, parameter generation, the test
/// operation itself, or per-case teardown fails. Carries the original cause
/// chain plus a readable message, so downstream reporting always sees the
/// user's real failure rather than an invocation wrapper.
#[derive(Debug)]
pub struct CapturedFailure {
    cause: anyhow::Error,
}

impl CapturedFailure {
    pub fn new(cause: anyhow::Error) -> Self {
        Self { cause }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            cause: anyhow!(message.into()),
        }
    }

    /// Normalize a panic payload into a failure carrying the panic message.
    ///
    /// Panic payloads from `panic!` and from runtime faults (arithmetic
    /// overflow, failed assertions) are `&str` or `String`; anything else is
    /// reported as an opaque panic.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "panicked with a non-string payload".to_string()
        };

        Self {
            cause: anyhow!(message),
        }
    }

    /// The readable message for this failure.
    pub fn message(&self) -> String {
        self.cause.to_string()
    }

    /// The underlying cause chain.
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }

    /// Consume the record, yielding the original cause.
    pub fn into_cause(self) -> anyhow::Error {
        self.cause
    }
}

impl fmt::Display for CapturedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}
