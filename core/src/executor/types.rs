use crate::error::TaskError;

/// Options for one engine run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Identifier stamped on every event of this run.
    pub run_id: String,

    /// If true, plan batches from the dependency graph; otherwise run
    /// everything as one flat batch.
    pub sort: bool,

    /// Concurrency ceiling within a batch. 0 means unbounded.
    pub concurrency: usize,
}

impl RunOptions {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            sort: false,
            concurrency: 0,
        }
    }

    pub fn sorted(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Output captured from one successful task.
#[derive(Debug, Clone, Default)]
pub struct TaskOutput {
    /// Tail of the task's combined stdout/stderr, possibly truncated.
    pub output_tail: String,
}

impl TaskOutput {
    pub fn new(output_tail: impl Into<String>) -> Self {
        Self {
            output_tail: output_tail.into(),
        }
    }
}

/// Terminal outcome of a run.
///
/// A failed run still drains every task that was already started; `drained`
/// records that this drain finished before the outcome was produced.
#[derive(Debug)]
pub enum RunOutcome {
    Success,
    Failed { first_error: TaskError, drained: bool },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn first_error(&self) -> Option<&TaskError> {
        match self {
            Self::Success => None,
            Self::Failed { first_error, .. } => Some(first_error),
        }
    }
}

/// Counters accumulated while a plan executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Tasks that finished successfully.
    pub completed: usize,
    /// Tasks that finished with an error.
    pub failed: usize,
    /// Tasks never started because an earlier error suppressed them.
    pub skipped: usize,
}

/// Final report assembled by the engine.
#[derive(Debug)]
pub struct ExecutionReport {
    pub total_packages: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    /// Planned batches by package name, in execution order.
    pub batches: Vec<Vec<String>>,
    pub outcome: RunOutcome,
}

impl ExecutionReport {
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }
}
