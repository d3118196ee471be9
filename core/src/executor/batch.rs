use std::collections::{HashMap, HashSet};

use crate::error::ExecError;
use crate::workspace::PackageNode;

/// Dependency graph over a closed set of packages.
///
/// Only edges between members of the set are kept: a dependency naming a
/// package outside the set is not an error, it simply contributes nothing
/// to the ordering.
#[derive(Debug, Clone)]
pub struct PackageGraph {
    /// Nodes in input order. Index into this vec is the node id everywhere.
    nodes: Vec<PackageNode>,

    /// Package name -> index in `nodes`.
    index: HashMap<String, usize>,

    /// Dependency edges: node -> in-set dependencies.
    edges: Vec<Vec<usize>>,

    /// Reverse edges: node -> nodes that depend on it.
    dependents: Vec<Vec<usize>>,
}

impl PackageGraph {
    /// Construct the graph from a package list.
    pub fn from_packages(packages: &[PackageNode]) -> Result<Self, ExecError> {
        let mut index = HashMap::with_capacity(packages.len());
        for (i, pkg) in packages.iter().enumerate() {
            if index.insert(pkg.name.clone(), i).is_some() {
                return Err(ExecError::DuplicatePackage(pkg.name.clone()));
            }
        }

        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); packages.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); packages.len()];
        for (i, pkg) in packages.iter().enumerate() {
            let mut seen = HashSet::new();
            for dep in &pkg.dependencies {
                // Dependencies pointing outside the set are ignored.
                let Some(&d) = index.get(dep.as_str()) else {
                    continue;
                };
                if seen.insert(d) {
                    edges[i].push(d);
                    dependents[d].push(i);
                }
            }
        }

        Ok(Self {
            nodes: packages.to_vec(),
            index,
            edges,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// In-set dependencies of `name`, in manifest order.
    pub fn dependencies_of(&self, name: &str) -> Option<Vec<&str>> {
        let &i = self.index.get(name)?;
        Some(
            self.edges[i]
                .iter()
                .map(|&d| self.nodes[d].name.as_str())
                .collect(),
        )
    }

    /// Partition the set into dependency-ordered batches (Kahn layering).
    ///
    /// Batch 0 holds every package with no in-set dependency; each later
    /// batch holds the packages whose dependencies are all in earlier
    /// batches. Within a batch, input order is preserved. Every package
    /// appears exactly once.
    pub fn batched(&self) -> Result<BatchPlan, ExecError> {
        if let Some(cycle) = self.detect_cycle() {
            return Err(ExecError::CyclicDependency(cycle));
        }

        let mut in_degree: Vec<usize> = self.edges.iter().map(Vec::len).collect();

        // Ascending index order within each batch keeps input order stable.
        let mut current: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();

        let mut batches: Vec<Vec<PackageNode>> = Vec::new();
        let mut placed = 0;

        while !current.is_empty() {
            placed += current.len();

            let mut next = Vec::new();
            for &i in &current {
                for &dependent in &self.dependents[i] {
                    in_degree[dependent] -= 1;
                    if in_degree[dependent] == 0 {
                        next.push(dependent);
                    }
                }
            }
            next.sort_unstable();

            batches.push(current.iter().map(|&i| self.nodes[i].clone()).collect());
            current = next;
        }

        // detect_cycle ran above, so this only guards against logic drift.
        if placed != self.nodes.len() {
            return Err(ExecError::CyclicDependency(
                "unable to complete batch layering (cycle detected)".to_string(),
            ));
        }

        Ok(BatchPlan { batches })
    }

    /// Detect cyclic dependencies using DFS. Returns the cycle as a
    /// readable path, e.g. `a -> b -> a`.
    fn detect_cycle(&self) -> Option<String> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = Vec::new();

        for start in 0..self.nodes.len() {
            if !visited[start] && self.dfs_cycle(start, &mut visited, &mut stack) {
                return Some(self.format_cycle_path(&stack));
            }
        }

        None
    }

    fn dfs_cycle(&self, node: usize, visited: &mut Vec<bool>, stack: &mut Vec<usize>) -> bool {
        visited[node] = true;
        stack.push(node);

        for &dep in &self.edges[node] {
            // Dependency already on the current path closes a cycle.
            if let Some(pos) = stack.iter().position(|&x| x == dep) {
                stack.push(dep);
                stack.drain(..pos);
                return true;
            }

            if !visited[dep] && self.dfs_cycle(dep, visited, stack) {
                return true;
            }
        }

        stack.pop();
        false
    }

    fn format_cycle_path(&self, stack: &[usize]) -> String {
        stack
            .iter()
            .map(|&i| self.nodes[i].name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Dependency-ordered sequence of batches. Produced either by
/// [`PackageGraph::batched`] or, for unsorted runs, [`BatchPlan::single`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPlan {
    batches: Vec<Vec<PackageNode>>,
}

impl BatchPlan {
    /// One flat batch holding every package in input order. An empty input
    /// produces an empty plan rather than a plan with one empty batch.
    pub fn single(packages: &[PackageNode]) -> Self {
        if packages.is_empty() {
            Self::default()
        } else {
            Self {
                batches: vec![packages.to_vec()],
            }
        }
    }

    pub fn batches(&self) -> &[Vec<PackageNode>] {
        &self.batches
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn package_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Batch layout by package name, mainly for events and reports.
    pub fn names(&self) -> Vec<Vec<String>> {
        self.batches
            .iter()
            .map(|b| b.iter().map(|p| p.name.clone()).collect())
            .collect()
    }
}
