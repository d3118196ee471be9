use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use plugrun_core::executor::{RunEvent, RunReporter};

/// Live terminal reporter: one overall bar counting finished packages plus
/// a spinner per in-flight package.
///
/// Reporting happens through `&self`, so the per-package spinner map sits
/// behind a mutex.
pub struct ProgressReporter {
    multi: MultiProgress,
    overall: ProgressBar,
    spinners: Mutex<HashMap<String, ProgressBar>>,
    total_batches: AtomicUsize,
    ascii_only: bool,
}

impl ProgressReporter {
    pub fn new(ascii_only: bool) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(0));

        let chars = if ascii_only { "#>-" } else { "█▓▒░  " };
        overall.set_style(
            ProgressStyle::default_bar()
                .template(
                    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} packages ({percent}%) {msg}",
                )
                .unwrap()
                .progress_chars(chars),
        );
        overall.set_message("starting");

        Self {
            multi,
            overall,
            spinners: Mutex::new(HashMap::new()),
            total_batches: AtomicUsize::new(0),
            ascii_only,
        }
    }

    fn add_spinner(&self, package: &str) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        let ticks: &[&str] = if self.ascii_only {
            &["-", "\\", "|", "/"]
        } else {
            &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.green} {msg}")
                .unwrap()
                .tick_strings(ticks),
        );
        let marker = if self.ascii_only { ">" } else { "⏳" };
        bar.set_message(format!("{} {}", marker, package));
        bar.enable_steady_tick(Duration::from_millis(100));

        self.spinners
            .lock()
            .unwrap()
            .insert(package.to_string(), bar);
    }

    fn finish_spinner(&self, package: &str, success: bool, duration_ms: u64) {
        if let Some(bar) = self.spinners.lock().unwrap().remove(package) {
            let icon = match (success, self.ascii_only) {
                (true, false) => "✅",
                (true, true) => "OK",
                (false, false) => "❌",
                (false, true) => "FAIL",
            };
            bar.finish_with_message(format!("{} {} ({}ms)", icon, package, duration_ms));
        }
        self.overall.inc(1);
    }
}

impl RunReporter for ProgressReporter {
    fn name(&self) -> &str {
        "progress-reporter"
    }

    fn report(&self, event: &RunEvent) {
        match event {
            RunEvent::RunStarted {
                total_packages,
                total_batches,
                ..
            } => {
                self.overall.set_length(*total_packages as u64);
                self.total_batches.store(*total_batches, Ordering::Relaxed);
            }
            RunEvent::PlanComputed { .. } => {}
            RunEvent::BatchStarted { batch_index, .. } => {
                let total = self.total_batches.load(Ordering::Relaxed);
                self.overall
                    .set_message(format!("batch {}/{}", batch_index + 1, total));
            }
            RunEvent::PackageStarted { package, .. } => {
                self.add_spinner(package);
            }
            RunEvent::PackageCompleted {
                package,
                success,
                duration_ms,
                ..
            } => {
                self.finish_spinner(package, *success, *duration_ms);
            }
            RunEvent::BatchCompleted { .. } => {}
            RunEvent::RunCompleted { success, .. } => {
                let msg = match (*success, self.ascii_only) {
                    (true, false) => "✅ all packages completed",
                    (true, true) => "all packages completed",
                    (false, false) => "❌ run failed",
                    (false, true) => "run failed",
                };
                self.overall.finish_with_message(msg);
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Spinners left behind by an aborted run must not keep ticking.
        for (_, bar) in self.spinners.lock().unwrap().drain() {
            bar.finish_and_clear();
        }
    }
}
