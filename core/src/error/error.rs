use std::path::PathBuf;

use thiserror::Error;

use super::exec::ExecError;
use crate::plugin::ResolutionAttempt;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("{0}")]
    Resolve(#[from] ResolveError),
    #[error("execution error: {0}")]
    Exec(#[from] ExecError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Problems locating or reading the multi-package tree.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("invalid package glob '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("cannot scan '{}': {source}", path.display())]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read manifest '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid manifest '{}': {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("duplicate package name '{name}' ('{}' and '{}')", first.display(), second.display())]
    DuplicatePackage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Plugin script resolution failures. `NotFound` keeps the full attempt
/// trail so callers can report exactly which locations were checked.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("unable to find plugin '{script}' after {} attempts", attempts.len())]
    NotFound {
        script: String,
        attempts: Vec<ResolutionAttempt>,
    },
    #[error("invalid plugin search pattern '{pattern}': {reason}")]
    BadPattern { pattern: String, reason: String },
}

impl ResolveError {
    /// Attempt trail for diagnostics, empty when the error carries none.
    pub fn attempts(&self) -> &[ResolutionAttempt] {
        match self {
            Self::NotFound { attempts, .. } => attempts,
            Self::BadPattern { .. } => &[],
        }
    }
}
