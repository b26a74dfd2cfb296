//! Result records aggregated by the runners.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Final outcome of one case, as reported to the listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CaseOutcome {
    Skipped {
        name: String,
        reason: Option<String>,
    },
    Passed {
        name: String,
        duration: Duration,
    },
    Failed {
        name: String,
        duration: Duration,
        message: String,
    },
}

impl CaseOutcome {
    pub fn skipped(name: String, reason: Option<String>) -> Self {
        CaseOutcome::Skipped { name, reason }
    }

    pub fn passed(name: String, duration: Duration) -> Self {
        CaseOutcome::Passed { name, duration }
    }

    pub fn failed(name: String, duration: Duration, message: String) -> Self {
        CaseOutcome::Failed { name, duration, message }
    }

    pub fn name(&self) -> &str {
        match self {
            CaseOutcome::Skipped { name, .. }
            | CaseOutcome::Passed { name, .. }
            | CaseOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CaseOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CaseOutcome::Skipped { .. })
    }
}

/// All outcomes for one class run, in reporting order: the skipped partition
/// in discovery order, then the executed partition in execution order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassResult {
    pub class: String,
    pub outcomes: Vec<CaseOutcome>,
}

impl ClassResult {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Total wall-clock time spent invoking this class's cases.
    pub fn duration(&self) -> Duration {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                CaseOutcome::Passed { duration, .. } | CaseOutcome::Failed { duration, .. } => {
                    *duration
                }
                CaseOutcome::Skipped { .. } => Duration::ZERO,
            })
            .sum()
    }
}

/// Aggregated results for a whole run across classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub classes: Vec<ClassResult>,
}

impl RunResult {
    pub fn new(
        classes: Vec<ClassResult>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("run-{}", Uuid::new_v4()),
            started_at,
            completed_at,
            classes,
        }
    }

    pub fn passed(&self) -> usize {
        self.classes.iter().map(ClassResult::passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.classes.iter().map(ClassResult::failed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.classes.iter().map(ClassResult::skipped).sum()
    }

    pub fn total(&self) -> usize {
        self.classes.iter().map(|class| class.outcomes.len()).sum()
    }
}
