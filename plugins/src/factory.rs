use std::sync::Arc;

use plugrun_core::executor::RunReporter;
use plugrun_core::plugin::{PluginInvoker, PluginResolver};
use plugrun_core::workspace::Workspace;

use crate::invoker::ProcessPluginInvoker;
use crate::reporter::{JsonlReporter, ProgressReporter, TextReporter};
use crate::resolver::FsPluginResolver;

/// Resolver bound to the workspace root and its configured search patterns.
pub fn build_resolver(workspace: &Workspace) -> Box<dyn PluginResolver> {
    Box::new(FsPluginResolver::new(
        workspace.root(),
        workspace.config().plugins.search.clone(),
    ))
}

/// Process invoker carrying the run id and the configured task limits.
pub fn build_invoker(workspace: &Workspace, run_id: &str) -> Box<dyn PluginInvoker> {
    let run_cfg = &workspace.config().run;
    Box::new(ProcessPluginInvoker::new(
        workspace.root(),
        run_id,
        run_cfg.task_timeout_secs,
        run_cfg.capture_bytes,
    ))
}

/// Pick the reporter for a run. `quiet` suppresses all progress output,
/// jsonl always streams machine events, a tty gets live bars and anything
/// else a plain line per event.
pub fn build_reporter(
    stream_format: &str,
    quiet: bool,
    ascii: bool,
    is_tty: bool,
) -> Option<Arc<dyn RunReporter>> {
    if quiet {
        return None;
    }
    match stream_format {
        "jsonl" => Some(Arc::new(JsonlReporter::new(false))),
        // Anything other than jsonl behaves like text.
        _ => {
            if is_tty {
                Some(Arc::new(ProgressReporter::new(ascii)))
            } else {
                Some(Arc::new(TextReporter::new(ascii)))
            }
        }
    }
}
