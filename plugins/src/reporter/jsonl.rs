use chrono::Local;
use serde_json::{json, Value};

use plugrun_core::executor::{RunEvent, RunReporter};

/// Machine-readable reporter: one JSON object per line per event.
pub struct JsonlReporter {
    pretty_print: bool,
}

impl JsonlReporter {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &RunEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            RunEvent::RunStarted {
                run_id,
                total_packages,
                total_batches,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "total_packages": total_packages,
                    "total_batches": total_batches,
                }
            }),
            RunEvent::PlanComputed { run_id, batches } => {
                let total_packages: usize = batches.iter().map(|b| b.len()).sum();
                json!({
                    "v": 1,
                    "event_type": "run.plan",
                    "ts": ts,
                    "run_id": run_id,
                    "metadata": {
                        "batches": batches,
                        "total_packages": total_packages,
                    }
                })
            }
            RunEvent::BatchStarted {
                run_id,
                batch_index,
                packages,
            } => json!({
                "v": 1,
                "event_type": "batch.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "batch_index": batch_index,
                    "packages": packages,
                }
            }),
            RunEvent::PackageStarted {
                run_id,
                batch_index,
                package,
            } => json!({
                "v": 1,
                "event_type": "package.start",
                "ts": ts,
                "run_id": run_id,
                "package": package,
                "metadata": {
                    "batch_index": batch_index,
                }
            }),
            RunEvent::PackageCompleted {
                run_id,
                batch_index,
                package,
                success,
                duration_ms,
                exit_code,
                output_tail,
                error,
            } => json!({
                "v": 1,
                "event_type": "package.end",
                "ts": ts,
                "run_id": run_id,
                "package": package,
                "code": exit_code,
                "metadata": {
                    "batch_index": batch_index,
                    "duration_ms": duration_ms,
                    "success": success,
                    "output_tail": output_tail,
                    "error": error,
                }
            }),
            RunEvent::BatchCompleted {
                run_id,
                batch_index,
            } => json!({
                "v": 1,
                "event_type": "batch.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "batch_index": batch_index,
                }
            }),
            RunEvent::RunCompleted {
                run_id,
                success,
                completed,
                failed,
                skipped,
                duration_ms,
            } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "success": success,
                    "completed": completed,
                    "failed": failed,
                    "skipped": skipped,
                    "duration_ms": duration_ms,
                }
            }),
        }
    }
}

impl RunReporter for JsonlReporter {
    fn name(&self) -> &str {
        "jsonl-reporter"
    }

    fn report(&self, event: &RunEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into())
            );
        } else {
            println!(
                "{}",
                serde_json::to_string(&value).unwrap_or_else(|_| "{}".into())
            );
        }
    }
}
