use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::backend::MetadataGraph;
use crate::errors::{ModGraphError, Result};
use crate::graph::paths::{has_path_prefix, is_stdlib_path, is_test_name};
use crate::types::{DependencyEdge, DependentEdge, PackageRecord};

/// Walks the package-level import graph of a metadata snapshot.
pub struct PackageGraphNavigator<'a> {
    metadata: &'a MetadataGraph,
    main_module: Option<&'a str>,
    stdlib_prefixes: &'a [String],
    test_suffix: &'a str,
}

impl<'a> PackageGraphNavigator<'a> {
    /// Creates a navigator with no known main module and no trusted stdlib prefixes.
    pub fn new(metadata: &'a MetadataGraph) -> Self {
        Self {
            metadata,
            main_module: None,
            stdlib_prefixes: &[],
            test_suffix: "_test",
        }
    }

    /// Sets the main module path used for external classification.
    pub fn with_main_module(mut self, main_module: Option<&'a str>) -> Self {
        self.main_module = main_module;
        self
    }

    pub fn with_stdlib_prefixes(mut self, prefixes: &'a [String]) -> Self {
        self.stdlib_prefixes = prefixes;
        self
    }

    pub fn with_test_suffix(mut self, suffix: &'a str) -> Self {
        self.test_suffix = suffix;
        self
    }

    /// Looks up the package at `path`.
    pub fn target(&self, path: &str) -> Result<&'a PackageRecord> {
        self.metadata
            .package_by_path(path)
            .ok_or_else(|| ModGraphError::package_not_found(path))
    }

    /// Forward dependencies of the package at `path`.
    ///
    /// Without `include_transitive` only direct imports (depth 0) are
    /// returned. With it, the walk proceeds level by level until `max_depth`
    /// levels have been emitted; `max_depth <= 0` means unbounded. Each
    /// package is reported once, at the shallowest depth it is reachable.
    pub fn dependencies(
        &self,
        path: &str,
        include_transitive: bool,
        max_depth: i32,
    ) -> Result<Vec<DependencyEdge>> {
        let target = self.target(path)?;

        // Breadth-first so every package is recorded at its shallowest depth.
        let mut visited: HashSet<&'a str> = HashSet::new();
        visited.insert(target.path.as_str());
        let mut edges = Vec::new();
        let mut queue: VecDeque<(&'a PackageRecord, u32)> = VecDeque::new();
        queue.push_back((target, 0));

        while let Some((pkg, depth)) = queue.pop_front() {
            if depth > 0 && !include_transitive {
                continue;
            }
            if max_depth > 0 && depth >= max_depth as u32 {
                continue;
            }
            for dep in self.unvisited_imports(pkg, &mut visited) {
                edges.push(self.edge(dep, depth));
                queue.push_back((dep, depth + 1));
            }
        }

        debug!(
            package = %path,
            edges = edges.len(),
            transitive = include_transitive,
            max_depth,
            "resolved dependencies"
        );
        Ok(edges)
    }

    /// Packages that directly import the package at `path`.
    pub fn dependents(&self, path: &str) -> Result<Vec<DependentEdge>> {
        let target = self.target(path)?;

        let mut edges: Vec<DependentEdge> = self
            .metadata
            .imported_by(&target.id)
            .iter()
            .filter_map(|id| self.metadata.get(id))
            .filter(|pkg| !pkg.is_intermediate_test_variant)
            .map(|pkg| DependentEdge {
                path: pkg.path.clone(),
                name: pkg.name.clone(),
                module: pkg.module_path().to_string(),
                is_test: is_test_name(&pkg.name, self.test_suffix),
            })
            .collect();

        edges.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
        Ok(edges)
    }

    /// Classifies a package reached at `depth`.
    pub fn edge(&self, pkg: &PackageRecord, depth: u32) -> DependencyEdge {
        let is_stdlib = is_stdlib_path(&pkg.path, self.stdlib_prefixes);
        let is_external = !is_stdlib
            && self
                .main_module
                .map(|main| !has_path_prefix(&pkg.path, main))
                .unwrap_or(false);

        DependencyEdge {
            path: pkg.path.clone(),
            name: pkg.name.clone(),
            module: pkg.module_path().to_string(),
            is_stdlib,
            is_external,
            depth,
        }
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Imports of `pkg` not yet in `visited`, in import-path order. Each
    /// returned package is marked visited.
    fn unvisited_imports(
        &self,
        pkg: &'a PackageRecord,
        visited: &mut HashSet<&'a str>,
    ) -> Vec<&'a PackageRecord> {
        let mut reached = Vec::new();
        for dep_id in pkg.imports.values() {
            let dep = match self.metadata.get(dep_id) {
                Some(d) => d,
                None => {
                    debug!(from = %pkg.id, missing = %dep_id, "import not in metadata graph");
                    continue;
                }
            };
            // Test variants stay out of the result and out of the visited set.
            if dep.is_intermediate_test_variant {
                continue;
            }
            if visited.insert(dep.path.as_str()) {
                reached.push(dep);
            }
        }
        reached
    }
}
