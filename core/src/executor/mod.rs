//! Batch planning and bounded parallel execution.
//!
//! Packages are layered into dependency-ordered batches, then each batch is
//! driven through a bounded concurrency window. Batches run strictly in
//! sequence; the first task error stops all further starts while in-flight
//! work drains.
//!
//! # Architecture
//!
//! ```text
//! Vec<PackageNode>
//!   ↓
//! PackageGraph::from_packages()
//!   ↓
//! PackageGraph::batched() → BatchPlan     (or BatchPlan::single for unsorted runs)
//!   ↓
//! ExecutionEngine::execute_plan() → run_batches() → ExecutionReport
//! ```

mod batch;
mod engine;
mod events;
mod runner;
mod types;

pub use batch::{BatchPlan, PackageGraph};
pub use engine::{execute_packages, ExecutionEngine};
pub use events::{RunEvent, RunReporter};
pub use runner::run_batches;
pub use types::{ExecutionReport, RunOptions, RunOutcome, RunStats, TaskOutput};
