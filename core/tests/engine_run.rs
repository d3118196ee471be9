mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{pkg, RecordingReporter};
use plugrun_core::api::{
    ExecutionEngine, PackageNode, RunEvent, RunOptions, TaskError, TaskOutput,
};

fn layered_fixture() -> Vec<PackageNode> {
    // Three layers with a couple of independent stragglers.
    vec![
        pkg("app-a", &["lib-x", "lib-y"]),
        pkg("app-b", &["lib-y", "lib-z"]),
        pkg("lib-x", &["base"]),
        pkg("lib-y", &["base"]),
        pkg("lib-z", &[]),
        pkg("base", &[]),
        pkg("docs", &[]),
    ]
}

#[tokio::test]
async fn sorted_run_completes_dependencies_before_dependents() {
    let packages = layered_fixture();
    let dep_map: HashMap<String, Vec<String>> = packages
        .iter()
        .map(|p| (p.name.clone(), p.dependencies.clone()))
        .collect();

    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let task_log = Arc::clone(&log);

    let engine = ExecutionEngine::new(RunOptions::new("run-1").sorted(true).concurrency(3));
    let report = engine
        .execute(&packages, move |pkg| {
            let log = Arc::clone(&task_log);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                log.lock().unwrap().push(pkg.name.clone());
                Ok(TaskOutput::default())
            }
        })
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.completed, 7);

    let order = log.lock().unwrap().clone();
    assert_eq!(order.len(), 7);
    for (i, name) in order.iter().enumerate() {
        for dep in &dep_map[name] {
            let dep_pos = order.iter().position(|n| n == dep);
            if let Some(dep_pos) = dep_pos {
                assert!(
                    dep_pos < i,
                    "{name} finished before its dependency {dep} (order: {order:?})"
                );
            }
        }
    }
}

#[tokio::test]
async fn unsorted_run_ignores_dependencies_entirely() {
    let reporter = Arc::new(RecordingReporter::default());
    let packages = vec![pkg("a", &["b"]), pkg("b", &["c"]), pkg("c", &[])];

    let engine = ExecutionEngine::new(RunOptions::new("run-2").concurrency(0))
        .with_reporter(Arc::clone(&reporter) as _);
    let report = engine
        .execute(&packages, |_pkg| async {
            Ok(TaskOutput::new("done"))
        })
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.batches, vec![vec!["a", "b", "c"]]);

    let batch_starts = reporter
        .events()
        .iter()
        .filter(|e| matches!(e, RunEvent::BatchStarted { .. }))
        .count();
    assert_eq!(batch_starts, 1);
}

#[tokio::test]
async fn failure_in_diamond_skips_only_the_dependent() {
    let reporter = Arc::new(RecordingReporter::default());
    let packages = vec![
        pkg("app", &["left", "right"]),
        pkg("left", &["base"]),
        pkg("right", &["base"]),
        pkg("base", &[]),
    ];

    let engine = ExecutionEngine::new(RunOptions::new("run-3").sorted(true).concurrency(2))
        .with_reporter(Arc::clone(&reporter) as _);
    let report = engine
        .execute(&packages, |pkg| async move {
            match pkg.name.as_str() {
                "left" => Err(TaskError::new("left", anyhow::anyhow!("lint failed"))
                    .with_exit_code(2)),
                "right" => {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok(TaskOutput::default())
                }
                _ => Ok(TaskOutput::default()),
            }
        })
        .await
        .unwrap();

    assert!(!report.success());
    assert_eq!(report.completed, 2, "base and right must both finish");
    assert_eq!(report.failed, 1);
    assert_eq!(report.skipped, 1, "app must never start");

    let first_error = report.outcome.first_error().unwrap();
    assert_eq!(first_error.package, "left");
    assert_eq!(first_error.exit_code, Some(2));

    let started = reporter.started_packages();
    assert!(!started.contains(&"app".to_string()));

    // Exactly one completion signal per started package.
    let mut completed: Vec<String> = reporter
        .completions()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    completed.sort();
    let mut started_sorted = started.clone();
    started_sorted.sort();
    assert_eq!(completed, started_sorted);
}

#[tokio::test]
async fn run_events_form_a_consistent_envelope() {
    let reporter = Arc::new(RecordingReporter::default());
    let packages = vec![pkg("one", &[]), pkg("two", &["one"])];

    let engine = ExecutionEngine::new(RunOptions::new("run-4").sorted(true).concurrency(1))
        .with_reporter(Arc::clone(&reporter) as _);
    engine
        .execute(&packages, |_pkg| async { Ok(TaskOutput::default()) })
        .await
        .unwrap();

    let events = reporter.events();
    assert!(matches!(
        events.first(),
        Some(RunEvent::RunStarted {
            total_packages: 2,
            total_batches: 2,
            ..
        })
    ));
    assert!(matches!(events.get(1), Some(RunEvent::PlanComputed { .. })));
    match events.last() {
        Some(RunEvent::RunCompleted {
            success,
            completed,
            failed,
            skipped,
            ..
        }) => {
            assert!(*success);
            assert_eq!(*completed, 2);
            assert_eq!(*failed, 0);
            assert_eq!(*skipped, 0);
        }
        other => panic!("expected RunCompleted last, got {other:?}"),
    }

    for event in &events {
        assert_eq!(event.run_id(), "run-4");
    }
}

#[tokio::test]
async fn cycle_aborts_before_any_task_starts() {
    let started = Arc::new(Mutex::new(0u32));
    let packages = vec![pkg("a", &["b"]), pkg("b", &["a"])];

    let task_started = Arc::clone(&started);
    let engine = ExecutionEngine::new(RunOptions::new("run-5").sorted(true));
    let err = engine
        .execute(&packages, move |_pkg| {
            let started = Arc::clone(&task_started);
            async move {
                *started.lock().unwrap() += 1;
                Ok(TaskOutput::default())
            }
        })
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("cyclic dependency"), "message: {message}");
    assert_eq!(*started.lock().unwrap(), 0);
}
