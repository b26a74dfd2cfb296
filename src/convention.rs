//! Convention: the configuration inputs the runner consumes.
//!
//! Everything here is a plain function value or trait object supplied by
//! the caller: a skip predicate, a skip-reason function, an in-place case
//! ordering, a lifecycle, a parameter source. The engine never inspects
//! metadata itself; predicates that want to can read the opaque tags
//! carried on each case.

use anyhow::Result;
use serde_json::Value;

use crate::lifecycle::{InstancePerCase, Lifecycle};
use crate::models::case::Case;
use crate::models::class::Operation;

/// Supplies argument lists per operation.
///
/// An operation with no parameters gets a single zero-argument case; a
/// source yielding N argument lists produces N cases. A source that fails
/// produces a single case carrying the failure, never a run abort.
pub trait ParameterSource {
    fn parameters(&self, operation: &Operation) -> Result<Vec<Vec<Value>>>;
}

/// Every operation is invoked once, with no arguments.
struct NoParameters;

impl ParameterSource for NoParameters {
    fn parameters(&self, _operation: &Operation) -> Result<Vec<Vec<Value>>> {
        Ok(Vec::new())
    }
}

/// Builder-style configuration for a run. Defaults: skip nothing, no skip
/// reasons, discovery order, [`InstancePerCase`] lifecycle, zero-argument
/// cases.
pub struct Convention {
    skip: Box<dyn Fn(&Case) -> bool>,
    skip_reason: Box<dyn Fn(&Case) -> Option<String>>,
    order: Box<dyn Fn(&mut [Case])>,
    lifecycle: Box<dyn Lifecycle>,
    parameters: Box<dyn ParameterSource>,
}

impl Convention {
    pub fn new() -> Self {
        Self {
            skip: Box::new(|_| false),
            skip_reason: Box::new(|_| None),
            order: Box::new(|_| {}),
            lifecycle: Box::new(InstancePerCase),
            parameters: Box::new(NoParameters),
        }
    }

    /// Cases matching the predicate are reported skipped and never executed.
    pub fn skip_when(mut self, predicate: impl Fn(&Case) -> bool + 'static) -> Self {
        self.skip = Box::new(predicate);
        self
    }

    /// Supplies the reason reported with predicate-skipped cases.
    pub fn skip_reason(mut self, reason: impl Fn(&Case) -> Option<String> + 'static) -> Self {
        self.skip_reason = Box::new(reason);
        self
    }

    /// Reorders the execute set in place before dispatch.
    pub fn sort_cases(mut self, order: impl Fn(&mut [Case]) + 'static) -> Self {
        self.order = Box::new(order);
        self
    }

    /// Selects the lifecycle driving each class run.
    pub fn lifecycle(mut self, lifecycle: impl Lifecycle + 'static) -> Self {
        self.lifecycle = Box::new(lifecycle);
        self
    }

    /// Selects the parameter source producing argument lists per operation.
    pub fn parameters(mut self, source: impl ParameterSource + 'static) -> Self {
        self.parameters = Box::new(source);
        self
    }

    pub(crate) fn should_skip(&self, case: &Case) -> bool {
        (self.skip)(case)
    }

    pub(crate) fn reason_for_skip(&self, case: &Case) -> Option<String> {
        (self.skip_reason)(case)
    }

    pub(crate) fn order_cases(&self, cases: &mut [Case]) {
        (self.order)(cases);
    }

    pub(crate) fn selected_lifecycle(&self) -> &dyn Lifecycle {
        self.lifecycle.as_ref()
    }

    pub(crate) fn parameter_source(&self) -> &dyn ParameterSource {
        self.parameters.as_ref()
    }
}

impl Default for Convention {
    fn default() -> Self {
        Self::new()
    }
}
