use std::sync::Mutex;

use plugrun_core::api::{PackageNode, RunEvent, RunReporter};

pub fn pkg(name: &str, deps: &[&str]) -> PackageNode {
    PackageNode::new(
        name,
        format!("/ws/packages/{name}"),
        deps.iter().map(|d| d.to_string()).collect(),
    )
}

/// Reporter that records every event for later inspection.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<RunEvent>>,
}

impl RunReporter for RecordingReporter {
    fn name(&self) -> &str {
        "recording"
    }

    fn report(&self, event: &RunEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn completions(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RunEvent::PackageCompleted {
                    package, success, ..
                } => Some((package, success)),
                _ => None,
            })
            .collect()
    }

    pub fn started_packages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RunEvent::PackageStarted { package, .. } => Some(package),
                _ => None,
            })
            .collect()
    }
}
