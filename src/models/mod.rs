pub mod case;
pub mod class;
pub mod failure;
pub mod outcome;

pub use case::{Case, CaseStatus};
pub use class::{Instance, Operation, OperationBody, OperationFuture, TestClass};
pub use failure::CapturedFailure;
pub use outcome::{CaseOutcome, ClassResult, RunResult};
