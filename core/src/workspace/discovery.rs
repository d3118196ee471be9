use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::WorkspaceError;

use super::package::PackageNode;

/// Expand the configured package globs under `root` and load every manifest
/// found. Directories matched by more than one pattern are visited once;
/// two distinct directories claiming the same package name is an error.
/// The result is sorted by package name so downstream ordering is stable.
pub fn discover_packages(
    root: &Path,
    patterns: &[String],
) -> Result<Vec<PackageNode>, WorkspaceError> {
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut seen_names: HashMap<String, PathBuf> = HashMap::new();
    let mut packages = Vec::new();

    for pattern in patterns {
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let entries =
            glob::glob(&full).map_err(|source| WorkspaceError::BadPattern {
                pattern: pattern.clone(),
                source,
            })?;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(WorkspaceError::Scan {
                        path,
                        source: e.into_error(),
                    });
                }
            };
            if !path.is_dir() || !visited.insert(path.clone()) {
                continue;
            }
            let Some(node) = PackageNode::from_dir(&path)? else {
                debug!(path = %path.display(), "skipping directory without manifest");
                continue;
            };
            if let Some(first) = seen_names.get(&node.name) {
                return Err(WorkspaceError::DuplicatePackage {
                    name: node.name,
                    first: first.clone(),
                    second: path,
                });
            }
            seen_names.insert(node.name.clone(), path);
            packages.push(node);
        }
    }

    packages.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = packages.len(), "discovered packages");
    Ok(packages)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::workspace::package::MANIFEST_FILE;

    fn write_package(root: &Path, rel: &str, name: &str, deps: &[&str]) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        let deps = deps
            .iter()
            .map(|d| format!("\"{d}\""))
            .collect::<Vec<_>>()
            .join(", ");
        fs::write(
            dir.join(MANIFEST_FILE),
            format!("name = \"{name}\"\ndependencies = [{deps}]\n"),
        )
        .unwrap();
    }

    #[test]
    fn finds_packages_sorted_by_name() {
        let root = TempDir::new().unwrap();
        write_package(root.path(), "packages/zeta", "zeta", &[]);
        write_package(root.path(), "packages/alpha", "alpha", &["zeta"]);

        let found =
            discover_packages(root.path(), &["packages/*".to_string()]).unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(found[0].dependencies, vec!["zeta"]);
    }

    #[test]
    fn skips_directories_without_manifest() {
        let root = TempDir::new().unwrap();
        write_package(root.path(), "packages/real", "real", &[]);
        fs::create_dir_all(root.path().join("packages/scratch")).unwrap();

        let found =
            discover_packages(root.path(), &["packages/*".to_string()]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "real");
    }

    #[test]
    fn overlapping_patterns_visit_a_directory_once() {
        let root = TempDir::new().unwrap();
        write_package(root.path(), "packages/only", "only", &[]);

        let patterns = vec!["packages/*".to_string(), "packages/only".to_string()];
        let found = discover_packages(root.path(), &patterns).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn duplicate_package_names_are_rejected() {
        let root = TempDir::new().unwrap();
        write_package(root.path(), "packages/a", "dup", &[]);
        write_package(root.path(), "modules/b", "dup", &[]);

        let patterns = vec!["packages/*".to_string(), "modules/*".to_string()];
        let err = discover_packages(root.path(), &patterns).unwrap_err();
        assert!(matches!(err, WorkspaceError::DuplicatePackage { .. }));
    }

    #[test]
    fn empty_tree_discovers_nothing() {
        let root = TempDir::new().unwrap();
        let found =
            discover_packages(root.path(), &["packages/*".to_string()]).unwrap();
        assert!(found.is_empty());
    }
}
