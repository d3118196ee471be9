use plugrun_core::executor::{RunEvent, RunReporter};

/// Plain line-per-event reporter for non-interactive output.
pub struct TextReporter {
    ascii_only: bool,
}

impl TextReporter {
    pub fn new(ascii_only: bool) -> Self {
        Self { ascii_only }
    }

    fn format_event(&self, event: &RunEvent) -> String {
        match event {
            RunEvent::RunStarted {
                run_id,
                total_packages,
                total_batches,
            } => format!(
                "RUN START {} (packages: {}, batches: {})",
                run_id, total_packages, total_batches
            ),
            RunEvent::PlanComputed { run_id, batches } => {
                let mut out = format!("PLAN {}:", run_id);
                for (idx, batch) in batches.iter().enumerate() {
                    out.push_str(&format!("\n  batch {}: {}", idx, batch.join(", ")));
                }
                out
            }
            RunEvent::BatchStarted {
                run_id,
                batch_index,
                packages,
            } => format!(
                "BATCH START {} (batch {}, packages: {})",
                run_id,
                batch_index,
                packages.len()
            ),
            RunEvent::PackageStarted {
                run_id,
                batch_index,
                package,
            } => format!(
                "PACKAGE START {} (batch {}, package {})",
                run_id, batch_index, package
            ),
            RunEvent::PackageCompleted {
                run_id,
                package,
                success,
                duration_ms,
                exit_code,
                error,
                ..
            } => {
                let status = if *success {
                    if self.ascii_only {
                        "OK"
                    } else {
                        "SUCCESS"
                    }
                } else if self.ascii_only {
                    "FAIL"
                } else {
                    "FAILED"
                };
                let exit = match exit_code {
                    Some(code) => code.to_string(),
                    None => "-".to_string(),
                };
                let mut line = format!(
                    "PACKAGE END {} (package {}, status {}, exit {}, duration {}ms)",
                    run_id, package, status, exit, duration_ms
                );
                if let Some(msg) = error {
                    line.push_str(&format!(": {}", msg));
                }
                line
            }
            RunEvent::BatchCompleted {
                run_id,
                batch_index,
            } => format!("BATCH END {} (batch {})", run_id, batch_index),
            RunEvent::RunCompleted {
                run_id,
                completed,
                failed,
                skipped,
                duration_ms,
                ..
            } => format!(
                "RUN END {} (completed {}, failed {}, skipped {}, duration {}ms)",
                run_id, completed, failed, skipped, duration_ms
            ),
        }
    }
}

impl RunReporter for TextReporter {
    fn name(&self) -> &str {
        "text-reporter"
    }

    fn report(&self, event: &RunEvent) {
        println!("{}", self.format_event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_end_line_carries_status_and_exit() {
        let reporter = TextReporter::new(true);
        let event = RunEvent::PackageCompleted {
            run_id: "run".to_string(),
            batch_index: 0,
            package: "pkg-a".to_string(),
            success: false,
            duration_ms: 5,
            exit_code: Some(1),
            output_tail: "oops".to_string(),
            error: Some("plugin 'lint' exited with code 1".to_string()),
        };

        let line = reporter.format_event(&event);
        assert!(line.contains("PACKAGE END"));
        assert!(line.contains("status FAIL"));
        assert!(line.contains("exit 1"));
        assert!(line.contains("exited with code 1"));
    }

    #[test]
    fn plan_lists_one_line_per_batch() {
        let reporter = TextReporter::new(false);
        let event = RunEvent::PlanComputed {
            run_id: "run".to_string(),
            batches: vec![
                vec!["base".to_string()],
                vec!["app-a".to_string(), "app-b".to_string()],
            ],
        };

        let text = reporter.format_event(&event);
        assert!(text.contains("batch 0: base"));
        assert!(text.contains("batch 1: app-a, app-b"));
    }

    #[test]
    fn run_end_line_counts_skipped() {
        let reporter = TextReporter::new(false);
        let event = RunEvent::RunCompleted {
            run_id: "run".to_string(),
            success: false,
            completed: 2,
            failed: 1,
            skipped: 3,
            duration_ms: 40,
        };

        let line = reporter.format_event(&event);
        assert!(line.contains("failed 1"));
        assert!(line.contains("skipped 3"));
    }
}
