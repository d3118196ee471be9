use std::future::Future;
use std::time::Instant;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tracing::debug;

use crate::error::TaskError;
use crate::workspace::PackageNode;

use super::batch::BatchPlan;
use super::events::{emit, RunEvent, RunReporter};
use super::types::{RunOutcome, RunStats, TaskOutput};

/// Drive every batch of `plan` to completion, in order.
///
/// Within a batch, at most `concurrency` tasks run at once (0 means
/// unbounded). The window is refilled from a cursor as tasks finish. No
/// task of batch N+1 starts before every task of batch N has completed.
///
/// On the first task error the cursor stops: nothing else is started, in
/// this batch or any later one, but tasks already running are awaited to
/// completion. Their errors are counted yet only the first is kept.
pub async fn run_batches<F, Fut>(
    run_id: &str,
    plan: &BatchPlan,
    concurrency: usize,
    reporter: Option<&dyn RunReporter>,
    task_fn: F,
) -> (RunOutcome, RunStats)
where
    F: Fn(PackageNode) -> Fut,
    Fut: Future<Output = Result<TaskOutput, TaskError>> + Send,
{
    let mut stats = RunStats::default();
    let mut first_error: Option<TaskError> = None;

    for (batch_index, batch) in plan.batches().iter().enumerate() {
        if first_error.is_some() {
            stats.skipped += batch.len();
            continue;
        }
        if batch.is_empty() {
            continue;
        }

        let names: Vec<String> = batch.iter().map(|p| p.name.clone()).collect();
        debug!(batch = batch_index, size = batch.len(), "starting batch");
        emit(
            reporter,
            RunEvent::BatchStarted {
                run_id: run_id.to_string(),
                batch_index,
                packages: names,
            },
        );

        let window = if concurrency == 0 {
            batch.len()
        } else {
            concurrency.min(batch.len())
        };

        let mut cursor = batch.iter();
        let mut in_flight = FuturesUnordered::new();

        // Prime the window up to the ceiling.
        while in_flight.len() < window {
            match cursor.next() {
                Some(pkg) => in_flight.push(run_one(
                    run_id,
                    batch_index,
                    pkg.clone(),
                    reporter,
                    &task_fn,
                )),
                None => break,
            }
        }

        while let Some(finished) = in_flight.next().await {
            match finished {
                Ok(()) => stats.completed += 1,
                Err(err) => {
                    stats.failed += 1;
                    if first_error.is_none() {
                        debug!(package = %err.package, "first error recorded, suppressing further starts");
                        first_error = Some(err);
                    }
                }
            }

            // The cursor only advances while the run is still clean.
            if first_error.is_none() {
                if let Some(pkg) = cursor.next() {
                    in_flight.push(run_one(
                        run_id,
                        batch_index,
                        pkg.clone(),
                        reporter,
                        &task_fn,
                    ));
                }
            }
        }

        if first_error.is_some() {
            stats.skipped += cursor.count();
        }

        emit(
            reporter,
            RunEvent::BatchCompleted {
                run_id: run_id.to_string(),
                batch_index,
            },
        );
    }

    let outcome = match first_error {
        None => RunOutcome::Success,
        // The loops above never return with work still in flight.
        Some(first_error) => RunOutcome::Failed {
            first_error,
            drained: true,
        },
    };
    (outcome, stats)
}

/// Run one task and emit its start/completion pair. The completion event is
/// emitted exactly once, whether the task succeeded or failed.
async fn run_one<F, Fut>(
    run_id: &str,
    batch_index: usize,
    pkg: PackageNode,
    reporter: Option<&dyn RunReporter>,
    task_fn: &F,
) -> Result<(), TaskError>
where
    F: Fn(PackageNode) -> Fut,
    Fut: Future<Output = Result<TaskOutput, TaskError>> + Send,
{
    let package = pkg.name.clone();
    emit(
        reporter,
        RunEvent::PackageStarted {
            run_id: run_id.to_string(),
            batch_index,
            package: package.clone(),
        },
    );

    let started = Instant::now();
    let result = task_fn(pkg).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(output) => {
            emit(
                reporter,
                RunEvent::PackageCompleted {
                    run_id: run_id.to_string(),
                    batch_index,
                    package,
                    success: true,
                    duration_ms,
                    exit_code: None,
                    output_tail: output.output_tail,
                    error: None,
                },
            );
            Ok(())
        }
        Err(err) => {
            emit(
                reporter,
                RunEvent::PackageCompleted {
                    run_id: run_id.to_string(),
                    batch_index,
                    package,
                    success: false,
                    duration_ms,
                    exit_code: err.exit_code,
                    output_tail: err.output_tail.clone(),
                    error: Some(err.to_string()),
                },
            );
            Err(err)
        }
    }
}
