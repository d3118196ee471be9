//! Seams for locating plugin scripts and turning them into package tasks.
//!
//! Resolution walks an explicit, ordered list of locations and records the
//! outcome of every attempt, so "not found" failures can say exactly where
//! the search looked. Nothing here consults the process working directory.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{ResolveError, TaskError};
use crate::executor::TaskOutput;
use crate::workspace::PackageNode;

/// A plugin script located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlugin {
    /// Script name as requested.
    pub script: String,
    /// Executable file backing the script.
    pub path: PathBuf,
}

impl ResolvedPlugin {
    pub fn new(script: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            path: path.into(),
        }
    }
}

/// One location checked during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionAttempt {
    pub location: PathBuf,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Found,
    NotFound,
    /// The location exists but could not be inspected. The underlying error
    /// is preserved instead of being treated as "not found".
    Io(String),
}

impl ResolutionAttempt {
    pub fn found(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            outcome: AttemptOutcome::Found,
        }
    }

    pub fn not_found(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            outcome: AttemptOutcome::NotFound,
        }
    }

    pub fn io(location: impl Into<PathBuf>, error: impl ToString) -> Self {
        Self {
            location: location.into(),
            outcome: AttemptOutcome::Io(error.to_string()),
        }
    }
}

/// Successful resolution: the winning plugin plus the full attempt trail,
/// including the attempts that missed before the hit.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub plugin: ResolvedPlugin,
    pub attempts: Vec<ResolutionAttempt>,
}

/// Locates plugin scripts by name. The first location that yields a hit
/// wins; later locations are not consulted.
pub trait PluginResolver: Send + Sync {
    fn name(&self) -> &str;
    fn resolve(&self, script: &str) -> Result<Resolution, ResolveError>;
}

/// Runs a resolved plugin once for one package.
#[async_trait]
pub trait PluginInvoker: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        plugin: &ResolvedPlugin,
        package: &PackageNode,
        args: &[String],
    ) -> Result<TaskOutput, TaskError>;
}
