//! Fatal run errors.
//!
//! Case-local failures never surface here; they are captured on the case and
//! reported through the listener. A `FatalError` means the class run itself
//! is invalid (a broken lifecycle, a misused dispatch contract) and no
//! per-case results can be trusted for that class.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatalError {
    /// A lifecycle invoked the case-dispatch closure more than once within a
    /// single class run.
    #[error("{message}")]
    CasesRunMultipleTimes { message: String },

    /// An error or panic escaped the lifecycle's own body rather than a case
    /// invocation it delegated. Never attributed to an individual case.
    #[error("lifecycle {lifecycle} failed while running {class}: {source}")]
    Lifecycle {
        lifecycle: String,
        class: String,
        #[source]
        source: anyhow::Error,
    },
}
