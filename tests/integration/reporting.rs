//! Listener payloads, reporting order, and whole-run aggregation.

use std::any::Any;
use std::time::Duration;

use anyhow::{bail, Result};
use serde_json::Value;

use gauntlet::convention::Convention;
use gauntlet::lifecycle::Lifecycle;
use gauntlet::models::class::{Operation, TestClass};
use gauntlet::models::outcome::CaseOutcome;
use gauntlet::runner::{ClassExecution, FatalError, Runner};

use crate::helpers::{init_tracing, new_trace, run_class, sample_class, RecordingListener};

/// Construct per case, except for operations the discovery tagged as
/// skipped, which are marked at dispatch time with the tag's reason.
struct SkipTagged;

impl Lifecycle for SkipTagged {
    fn execute(&self, class: &TestClass, cases: &mut ClassExecution<'_>) -> Result<()> {
        cases.run_cases(|case| {
            if case.tags().iter().any(|tag| tag == "skip") {
                let reason = case
                    .tags()
                    .iter()
                    .find_map(|tag| tag.strip_prefix("reason:"))
                    .map(str::to_string);
                case.skip(reason);
                return Ok(());
            }

            let mut instance = class.construct()?;
            case.execute(instance.as_mut());
            Ok(())
        })
    }
}

fn unreachable_operation(name: &str) -> Operation {
    Operation::sync(name, |_: &mut dyn Any, _: &[Value]| {
        bail!("should be unreachable")
    })
}

#[test]
fn test_lifecycle_skips_report_with_and_without_reason() {
    let trace = new_trace();
    let class = sample_class(&trace, &[])
        .operation(unreachable_operation("SkipWithoutReason").with_tags(vec!["skip".to_string()]))
        .operation(unreachable_operation("SkipWithReason").with_tags(vec![
            "skip".to_string(),
            "reason:Skipped with reason.".to_string(),
        ]));
    let convention = Convention::new().lifecycle(SkipTagged);

    let (result, entries) = run_class(&convention, &class);

    let result = result.expect("Should run");
    assert_eq!(
        entries,
        [
            "SampleTestClass.Pass passed",
            "SampleTestClass.Fail failed: 'Fail' failed!",
            "SampleTestClass.SkipWithoutReason skipped",
            "SampleTestClass.SkipWithReason skipped: Skipped with reason."
        ]
    );
    assert_eq!(result.passed(), 1);
    assert_eq!(result.failed(), 1);
    assert_eq!(result.skipped(), 2);
}

#[test]
fn test_predicate_skips_are_reported_before_any_execution() {
    let trace = new_trace();
    let class = sample_class(&trace, &[]);
    let convention = Convention::new()
        .skip_when(|case| case.operation_name() == "Fail")
        .skip_reason(|case| Some(format!("{} is excluded", case.operation_name())));

    let (result, entries) = run_class(&convention, &class);

    assert!(result.is_ok());
    assert_eq!(
        entries,
        [
            "SampleTestClass.Fail skipped: Fail is excluded",
            "SampleTestClass.Pass passed"
        ],
        "The skip partition reports before the execute partition regardless of discovery order"
    );
}

#[test]
fn test_pass_duration_reflects_the_invocation() {
    let class = TestClass::new("SlowTestClass")
        .factory(|| Ok(Box::new(())))
        .operation(Operation::sync("Nap", |_, _| {
            std::thread::sleep(Duration::from_millis(5));
            Ok(None)
        }));

    let (result, _entries) = run_class(&Convention::new(), &class);

    let result = result.expect("Should run");
    match &result.outcomes[0] {
        CaseOutcome::Passed { duration, .. } => {
            assert!(
                *duration >= Duration::from_millis(5),
                "Duration should cover the invocation: {duration:?}"
            );
        }
        other => panic!("Expected a pass, got: {other:?}"),
    }
}

#[test]
fn test_suite_run_aggregates_classes_in_order() {
    init_tracing();

    let trace = new_trace();
    let classes = vec![
        sample_class(&trace, &[]),
        TestClass::new("EmptyTestClass"),
    ];
    let convention = Convention::new();
    let mut listener = RecordingListener::default();

    let run = Runner::new(&mut listener, &convention)
        .run(&classes)
        .expect("Should run");

    assert!(run.id.starts_with("run-"));
    assert!(run.completed_at >= run.started_at);
    assert_eq!(run.classes.len(), 2);
    assert_eq!(run.classes[0].class, "SampleTestClass");
    assert_eq!(run.classes[1].class, "EmptyTestClass");
    assert!(run.classes[1].outcomes.is_empty());
    assert_eq!(run.total(), 2);
    assert_eq!(run.passed(), 1);
    assert_eq!(run.failed(), 1);
    assert_eq!(run.skipped(), 0);
}

struct AbortiveLifecycle;

impl Lifecycle for AbortiveLifecycle {
    fn execute(&self, _class: &TestClass, _cases: &mut ClassExecution<'_>) -> Result<()> {
        bail!("listener wiring is broken")
    }
}

#[test]
fn test_suite_run_aborts_on_the_first_fatal_error() {
    init_tracing();

    let first_trace = new_trace();
    let second_trace = new_trace();
    let classes = vec![
        sample_class(&first_trace, &[]),
        sample_class(&second_trace, &[]),
    ];
    let convention = Convention::new().lifecycle(AbortiveLifecycle);
    let mut listener = RecordingListener::default();

    let error = Runner::new(&mut listener, &convention)
        .run(&classes)
        .unwrap_err();

    assert!(matches!(error, FatalError::Lifecycle { .. }));
    assert!(listener.entries.is_empty());
    assert!(
        second_trace.borrow().is_empty(),
        "No later class may run after a fatal error"
    );
}
