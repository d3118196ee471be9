use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::error::{ExecError, TaskError};
use crate::workspace::PackageNode;

use super::batch::{BatchPlan, PackageGraph};
use super::events::{emit, RunEvent, RunReporter};
use super::runner::run_batches;
use super::types::{ExecutionReport, RunOptions, TaskOutput};

/// Plans batches for a package set and drives them through the runner,
/// emitting run-level events around the per-batch ones.
pub struct ExecutionEngine {
    opts: RunOptions,
    reporter: Option<Arc<dyn RunReporter>>,
}

impl ExecutionEngine {
    pub fn new(opts: RunOptions) -> Self {
        Self {
            opts,
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn RunReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Batch plan for `packages` under the current options: dependency
    /// layers when sorting is on, one flat batch otherwise.
    pub fn plan(&self, packages: &[PackageNode]) -> Result<BatchPlan, ExecError> {
        if self.opts.sort {
            PackageGraph::from_packages(packages)?.batched()
        } else {
            Ok(BatchPlan::single(packages))
        }
    }

    /// Plan and execute one task per package.
    pub async fn execute<F, Fut>(
        &self,
        packages: &[PackageNode],
        task_fn: F,
    ) -> Result<ExecutionReport, ExecError>
    where
        F: Fn(PackageNode) -> Fut,
        Fut: Future<Output = Result<TaskOutput, TaskError>> + Send,
    {
        let plan = self.plan(packages)?;
        Ok(self.execute_plan(&plan, task_fn).await)
    }

    /// Execute an already computed plan.
    pub async fn execute_plan<F, Fut>(&self, plan: &BatchPlan, task_fn: F) -> ExecutionReport
    where
        F: Fn(PackageNode) -> Fut,
        Fut: Future<Output = Result<TaskOutput, TaskError>> + Send,
    {
        let run_id = if self.opts.run_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            self.opts.run_id.clone()
        };

        let start = Instant::now();
        let total_packages = plan.package_count();
        let reporter = self.reporter.as_deref();

        emit(
            reporter,
            RunEvent::RunStarted {
                run_id: run_id.clone(),
                total_packages,
                total_batches: plan.batch_count(),
            },
        );
        emit(
            reporter,
            RunEvent::PlanComputed {
                run_id: run_id.clone(),
                batches: plan.names(),
            },
        );

        let (outcome, stats) = run_batches(
            &run_id,
            plan,
            self.opts.concurrency,
            reporter,
            task_fn,
        )
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        emit(
            reporter,
            RunEvent::RunCompleted {
                run_id: run_id.clone(),
                success: outcome.is_success(),
                completed: stats.completed,
                failed: stats.failed,
                skipped: stats.skipped,
                duration_ms,
            },
        );
        info!(
            run_id = %run_id,
            completed = stats.completed,
            failed = stats.failed,
            skipped = stats.skipped,
            duration_ms,
            "run finished"
        );

        ExecutionReport {
            total_packages,
            completed: stats.completed,
            failed: stats.failed,
            skipped: stats.skipped,
            duration_ms,
            batches: plan.names(),
            outcome,
        }
    }
}

/// One-shot convenience wrapper around [`ExecutionEngine`].
pub async fn execute_packages<F, Fut>(
    packages: &[PackageNode],
    opts: RunOptions,
    task_fn: F,
) -> Result<ExecutionReport, ExecError>
where
    F: Fn(PackageNode) -> Fut,
    Fut: Future<Output = Result<TaskOutput, TaskError>> + Send,
{
    ExecutionEngine::new(opts).execute(packages, task_fn).await
}
