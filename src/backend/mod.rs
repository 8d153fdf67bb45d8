//! The code intelligence backend seam.
//!
//! Parsing, type checking and symbol extraction live behind these traits.
//! A [`Backend`] hands out scoped [`Snapshot`] views; the engine only reads
//! from a view and never mutates it.

/// Filesystem manifest discovery.
pub mod discover;

/// In-memory backend over explicit workspace data.
pub mod memory;

pub use discover::discover_manifests;
pub use memory::{MemoryBackend, MemorySnapshot, MemorySnapshotBuilder, MemoryView};

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::errors::Result;
use crate::manifest::{GoModParser, ManifestFile, ManifestParser};
use crate::types::{PackageRecord, Symbol};

/// A consistent, versioned, read-only view of one workspace.
pub trait Snapshot {
    /// Workspace root directory.
    fn root(&self) -> &Path;

    /// Monotonic version of the workspace state this view was taken from.
    fn version(&self) -> u64;

    /// Manifest files of the workspace, main module first.
    fn manifest_files(&self) -> Result<Vec<ManifestFile>>;

    /// Parser used to read the manifests returned by [`Snapshot::manifest_files`].
    fn manifest_parser(&self) -> &dyn ManifestParser {
        &GoModParser
    }

    /// Package metadata graph.
    fn metadata(&self) -> &MetadataGraph;

    /// Exported symbols declared in one compiled source file.
    fn exported_symbols(&self, file: &Path) -> Result<Vec<Symbol>>;
}

/// Hands out snapshot views. Dropping a view releases it.
pub trait Backend {
    type View: Snapshot;

    /// Acquires a view of the workspace containing `dir`, or the default
    /// workspace when `dir` is `None`.
    fn acquire(&self, dir: Option<&Path>) -> Result<Self::View>;
}

/// Package-level metadata: records by id, a path index, and the reverse
/// import index.
#[derive(Debug, Clone, Default)]
pub struct MetadataGraph {
    packages: BTreeMap<String, PackageRecord>,
    by_path: HashMap<String, Vec<String>>,
    imported_by: HashMap<String, Vec<String>>,
}

impl MetadataGraph {
    /// Indexes `packages`. A later record with an already-seen id replaces the earlier one.
    pub fn new(packages: impl IntoIterator<Item = PackageRecord>) -> Self {
        let packages: BTreeMap<String, PackageRecord> =
            packages.into_iter().map(|p| (p.id.clone(), p)).collect();

        let mut by_path: HashMap<String, Vec<String>> = HashMap::new();
        let mut imported_by: HashMap<String, Vec<String>> = HashMap::new();
        for pkg in packages.values() {
            by_path
                .entry(pkg.path.clone())
                .or_default()
                .push(pkg.id.clone());
            for dep_id in pkg.imports.values() {
                imported_by
                    .entry(dep_id.clone())
                    .or_default()
                    .push(pkg.id.clone());
            }
        }

        Self {
            packages,
            by_path,
            imported_by,
        }
    }

    /// Looks up a package by id.
    pub fn get(&self, id: &str) -> Option<&PackageRecord> {
        self.packages.get(id)
    }

    /// Looks up a package by import path, preferring the record that is not
    /// an intermediate test variant.
    pub fn package_by_path(&self, path: &str) -> Option<&PackageRecord> {
        let ids = self.by_path.get(path)?;
        let mut candidates = ids.iter().filter_map(|id| self.packages.get(id));
        let first = candidates.next()?;
        if !first.is_intermediate_test_variant {
            return Some(first);
        }
        candidates
            .find(|p| !p.is_intermediate_test_variant)
            .or(Some(first))
    }

    /// Ids of the packages that directly import `id`, in id order.
    pub fn imported_by(&self, id: &str) -> &[String] {
        self.imported_by.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All packages in id order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
