use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::WorkspaceError;

/// Per-package manifest file name.
pub const MANIFEST_FILE: &str = "package.toml";

/// One unit in the multi-package tree: a name, the directory that holds it,
/// and the names of the packages it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub name: String,
    pub path: PathBuf,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

impl PackageNode {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            dependencies,
        }
    }

    /// Read the manifest inside `dir`. Directories without one are not
    /// packages and yield `None`; a manifest that exists but cannot be read
    /// or parsed is an error.
    pub fn from_dir(dir: &Path) -> Result<Option<Self>, WorkspaceError> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&manifest_path).map_err(|source| {
            WorkspaceError::ManifestRead {
                path: manifest_path.clone(),
                source,
            }
        })?;
        let manifest: PackageManifest =
            toml::from_str(&raw).map_err(|source| WorkspaceError::ManifestParse {
                path: manifest_path,
                source,
            })?;
        Ok(Some(Self {
            name: manifest.name,
            path: dir.to_path_buf(),
            dependencies: manifest.dependencies,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_manifest_with_dependencies() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "name = \"app\"\ndependencies = [\"lib-a\", \"lib-b\"]\n",
        )
        .unwrap();

        let node = PackageNode::from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(node.name, "app");
        assert_eq!(node.path, dir.path());
        assert_eq!(node.dependencies, vec!["lib-a", "lib-b"]);
    }

    #[test]
    fn dependencies_default_to_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "name = \"leaf\"\n").unwrap();

        let node = PackageNode::from_dir(dir.path()).unwrap().unwrap();
        assert!(node.dependencies.is_empty());
    }

    #[test]
    fn directory_without_manifest_is_not_a_package() {
        let dir = TempDir::new().unwrap();
        assert!(PackageNode::from_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "name = [not toml").unwrap();

        let err = PackageNode::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::ManifestParse { .. }));
    }
}
