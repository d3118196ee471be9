/// Progress events emitted while a plan executes.
///
/// Every variant carries the run id so reporters can stay stateless. Exactly
/// one `PackageCompleted` is emitted per finished task, whether it succeeded
/// or failed; suppressed tasks emit nothing.
#[derive(Debug, Clone)]
pub enum RunEvent {
    RunStarted {
        run_id: String,
        total_packages: usize,
        total_batches: usize,
    },
    PlanComputed {
        run_id: String,
        batches: Vec<Vec<String>>,
    },
    BatchStarted {
        run_id: String,
        batch_index: usize,
        packages: Vec<String>,
    },
    PackageStarted {
        run_id: String,
        batch_index: usize,
        package: String,
    },
    PackageCompleted {
        run_id: String,
        batch_index: usize,
        package: String,
        success: bool,
        duration_ms: u64,
        exit_code: Option<i32>,
        /// Tail of the task's combined output, possibly truncated.
        output_tail: String,
        error: Option<String>,
    },
    BatchCompleted {
        run_id: String,
        batch_index: usize,
    },
    RunCompleted {
        run_id: String,
        success: bool,
        completed: usize,
        failed: usize,
        skipped: usize,
        duration_ms: u64,
    },
}

impl RunEvent {
    pub fn run_id(&self) -> &str {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::PlanComputed { run_id, .. }
            | Self::BatchStarted { run_id, .. }
            | Self::PackageStarted { run_id, .. }
            | Self::PackageCompleted { run_id, .. }
            | Self::BatchCompleted { run_id, .. }
            | Self::RunCompleted { run_id, .. } => run_id,
        }
    }
}

/// Sink for run events. Implementations render to a terminal, a progress
/// bar, or a machine-readable stream.
pub trait RunReporter: Send + Sync {
    fn name(&self) -> &str;
    fn report(&self, event: &RunEvent);
}

/// Forward `event` when a reporter is attached.
pub(crate) fn emit(reporter: Option<&dyn RunReporter>, event: RunEvent) {
    if let Some(r) = reporter {
        r.report(&event);
    }
}
