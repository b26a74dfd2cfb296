//! Listener boundary: the sink notified of per-case events.
//!
//! The engine's only obligation is calling the listener with the right
//! timing and payload; transport and formatting belong to the caller. Skip
//! events for cases excluded by the skip predicate arrive before any
//! execution for the same class; pass/fail events arrive after the
//! lifecycle returns, in execution order.

use std::time::Duration;

use crate::models::case::Case;
use crate::models::failure::CapturedFailure;

pub trait Listener {
    fn case_skipped(&mut self, case: &Case, reason: Option<&str>);

    fn case_passed(&mut self, case: &Case, duration: Duration);

    fn case_failed(&mut self, case: &Case, duration: Duration, failure: &CapturedFailure);
}

/// Discards every event. Useful when only the aggregated results matter.
pub struct NullListener;

impl Listener for NullListener {
    fn case_skipped(&mut self, _case: &Case, _reason: Option<&str>) {}

    fn case_passed(&mut self, _case: &Case, _duration: Duration) {}

    fn case_failed(&mut self, _case: &Case, _duration: Duration, _failure: &CapturedFailure) {}
}
