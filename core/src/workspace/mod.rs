//! Multi-package tree discovery.
//!
//! A workspace is any directory holding a `plugrun.toml` marker. Packages
//! live in subdirectories matched by the configured globs, each carrying a
//! `package.toml` manifest with its name and dependency names.

mod discovery;
mod package;

pub use discovery::discover_packages;
pub use package::{PackageNode, MANIFEST_FILE};

use std::path::{Path, PathBuf};

use crate::config::{self, AppConfig};
use crate::error::WorkspaceError;

/// A located workspace root plus its loaded configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: AppConfig,
}

impl Workspace {
    /// Walk up from `start` to the nearest directory containing the
    /// workspace marker and load its configuration.
    pub fn locate(start: &Path) -> anyhow::Result<Self> {
        let (root, config) = config::load_from(start)?;
        Ok(Self { root, config })
    }

    /// Assemble a workspace from known parts, mainly for tests.
    pub fn from_parts(root: impl Into<PathBuf>, config: AppConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// All packages under this root, sorted by name.
    pub fn packages(&self) -> Result<Vec<PackageNode>, WorkspaceError> {
        discover_packages(&self.root, &self.config.workspace.packages)
    }
}
