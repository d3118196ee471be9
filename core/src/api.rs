//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `plugrun_core::api` instead of reaching into internal modules.

pub use crate::config::{
    find_root, load_at, load_from, AppConfig, LoggingConfig, PluginsConfig, RunConfig,
    WorkspaceConfig, WORKSPACE_FILE,
};
pub use crate::error::{CliError, ExecError, ResolveError, TaskError, WorkspaceError};
pub use crate::executor::{
    execute_packages, run_batches, BatchPlan, ExecutionEngine, ExecutionReport, PackageGraph,
    RunEvent, RunOptions, RunOutcome, RunReporter, RunStats, TaskOutput,
};
pub use crate::plugin::{
    AttemptOutcome, PluginInvoker, PluginResolver, Resolution, ResolutionAttempt, ResolvedPlugin,
};
pub use crate::util::TailBuffer;
pub use crate::workspace::{discover_packages, PackageNode, Workspace, MANIFEST_FILE};
