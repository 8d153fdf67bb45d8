use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::{discover_manifests, Backend, MetadataGraph, Snapshot};
use crate::config::ModGraphConfig;
use crate::errors::{ModGraphError, Result};
use crate::graph::paths::normalize_path;
use crate::manifest::ManifestFile;
use crate::types::{PackageRecord, Symbol};

/// A workspace snapshot held entirely in memory.
#[derive(Debug)]
pub struct MemorySnapshot {
    root: PathBuf,
    version: u64,
    manifests: Vec<ManifestFile>,
    metadata: MetadataGraph,
    /// Per-file extraction outcome; `Err` holds the failure message.
    symbols: HashMap<PathBuf, std::result::Result<Vec<Symbol>, String>>,
}

/// Collects the contents of a [`MemorySnapshot`].
#[derive(Debug, Default)]
pub struct MemorySnapshotBuilder {
    root: PathBuf,
    version: u64,
    manifests: Vec<ManifestFile>,
    packages: Vec<PackageRecord>,
    symbols: HashMap<PathBuf, std::result::Result<Vec<Symbol>, String>>,
}

impl MemorySnapshot {
    pub fn builder(root: impl Into<PathBuf>) -> MemorySnapshotBuilder {
        MemorySnapshotBuilder {
            root: normalize_path(&root.into()),
            version: 1,
            ..MemorySnapshotBuilder::default()
        }
    }
}

impl MemorySnapshotBuilder {
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Adds a manifest. A relative `path` is taken relative to the root.
    pub fn manifest(mut self, path: impl AsRef<Path>, text: &str) -> Self {
        let path = self.root.join(path);
        self.manifests.push(ManifestFile::new(path, text));
        self
    }

    /// Adds every manifest found on disk under the root.
    pub fn manifests_from_disk(mut self, config: &ModGraphConfig) -> Result<Self> {
        let found = discover_manifests(&self.root, config)?;
        self.manifests.extend(found);
        Ok(self)
    }

    pub fn package(mut self, package: PackageRecord) -> Self {
        self.packages.push(package);
        self
    }

    pub fn packages(mut self, packages: impl IntoIterator<Item = PackageRecord>) -> Self {
        self.packages.extend(packages);
        self
    }

    /// Registers the exported symbols of one source file.
    pub fn symbols(mut self, file: impl Into<PathBuf>, symbols: Vec<Symbol>) -> Self {
        self.symbols.insert(file.into(), Ok(symbols));
        self
    }

    /// Registers a source file whose symbols cannot be extracted.
    pub fn broken_file(mut self, file: impl Into<PathBuf>, message: &str) -> Self {
        self.symbols.insert(file.into(), Err(message.to_string()));
        self
    }

    pub fn build(self) -> MemorySnapshot {
        MemorySnapshot {
            root: self.root,
            version: self.version,
            manifests: self.manifests,
            metadata: MetadataGraph::new(self.packages),
            symbols: self.symbols,
        }
    }
}

impl Snapshot for MemorySnapshot {
    fn root(&self) -> &Path {
        &self.root
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn manifest_files(&self) -> Result<Vec<ManifestFile>> {
        Ok(self.manifests.clone())
    }

    fn metadata(&self) -> &MetadataGraph {
        &self.metadata
    }

    fn exported_symbols(&self, file: &Path) -> Result<Vec<Symbol>> {
        match self.symbols.get(file) {
            Some(Ok(symbols)) => Ok(symbols.clone()),
            Some(Err(message)) => Err(ModGraphError::Parse {
                message: message.clone(),
                path: file.display().to_string(),
                line: None,
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Backend serving one or more in-memory workspaces.
///
/// Tracks how many views are currently acquired.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshots: Vec<Arc<MemorySnapshot>>,
    active: Arc<AtomicUsize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend serving a single workspace.
    pub fn with_snapshot(snapshot: MemorySnapshot) -> Self {
        let mut backend = Self::new();
        backend.insert(snapshot);
        backend
    }

    /// Adds a workspace. The first one inserted is the default workspace.
    pub fn insert(&mut self, snapshot: MemorySnapshot) {
        self.snapshots.push(Arc::new(snapshot));
    }

    /// Number of views acquired and not yet dropped.
    pub fn active_views(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// The workspace whose root is the closest ancestor of `dir`.
    fn find(&self, dir: &Path) -> Option<&Arc<MemorySnapshot>> {
        let dir = normalize_path(dir);
        self.snapshots
            .iter()
            .filter(|s| dir.starts_with(&s.root))
            .max_by_key(|s| s.root.components().count())
    }
}

impl Backend for MemoryBackend {
    type View = MemoryView;

    fn acquire(&self, dir: Option<&Path>) -> Result<MemoryView> {
        let snapshot = match dir {
            Some(d) => self.find(d),
            None => self.snapshots.first(),
        }
        .ok_or_else(|| ModGraphError::Backend {
            message: match dir {
                Some(d) => format!("no workspace loaded for '{}'", d.display()),
                None => "no workspace loaded".to_string(),
            },
        })?;

        self.active.fetch_add(1, Ordering::SeqCst);
        debug!(root = %snapshot.root.display(), version = snapshot.version, "acquired snapshot");
        Ok(MemoryView {
            snapshot: Arc::clone(snapshot),
            active: Arc::clone(&self.active),
        })
    }
}

/// An acquired view of a [`MemorySnapshot`]; released on drop.
#[derive(Debug)]
pub struct MemoryView {
    snapshot: Arc<MemorySnapshot>,
    active: Arc<AtomicUsize>,
}

impl Drop for MemoryView {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
        debug!(root = %self.snapshot.root.display(), "released snapshot");
    }
}

impl Snapshot for MemoryView {
    fn root(&self) -> &Path {
        self.snapshot.root()
    }

    fn version(&self) -> u64 {
        self.snapshot.version()
    }

    fn manifest_files(&self) -> Result<Vec<ManifestFile>> {
        self.snapshot.manifest_files()
    }

    fn metadata(&self) -> &MetadataGraph {
        self.snapshot.metadata()
    }

    fn exported_symbols(&self, file: &Path) -> Result<Vec<Symbol>> {
        self.snapshot.exported_symbols(file)
    }
}
