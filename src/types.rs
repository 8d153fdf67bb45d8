use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Modules
// ---------------------------------------------------------------------------

/// A module as seen by the workspace: the main module, a requirement, or a
/// replacement target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub path: String,
    /// Empty for the main module.
    pub version: String,
    pub is_main: bool,
    pub is_indirect: bool,
    /// The module path this record supersedes, when it is a replacement target.
    pub replaces: Option<String>,
    /// Set when the module resolves to a directory instead of a registry version.
    pub local_file_path: Option<PathBuf>,
}

impl ModuleRecord {
    /// Creates a registry-versioned, direct module record.
    pub fn required(path: &str, version: &str) -> Self {
        Self {
            path: path.to_string(),
            version: version.to_string(),
            is_main: false,
            is_indirect: false,
            replaces: None,
            local_file_path: None,
        }
    }
}

/// Result of `ListModules`: the main module plus its classified neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleListing {
    pub main_module: String,
    /// Main module first, then siblings ordered by shared path prefix.
    pub internal: Vec<ModuleRecord>,
    /// Sorted lexicographically by path.
    pub external: Vec<ModuleRecord>,
}

impl ModuleListing {
    /// Iterates internal modules followed by external modules.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.internal.iter().chain(self.external.iter())
    }

    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

/// The module a package belongs to, as reported by the metadata graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageModule {
    pub path: String,
    pub version: String,
    pub dir: Option<PathBuf>,
}

/// A package record supplied by the backend's metadata graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Unique id; test variants share `path` but never `id`.
    pub id: String,
    pub path: String,
    pub name: String,
    pub module: Option<PackageModule>,
    pub compiled_files: Vec<PathBuf>,
    /// Direct imports: import path -> package id.
    pub imports: BTreeMap<String, String>,
    /// Synthetic record for a package compiled into its own test binary.
    pub is_intermediate_test_variant: bool,
}

impl PackageRecord {
    /// Creates a package whose id equals its import path.
    pub fn new(path: &str, name: &str) -> Self {
        Self {
            id: path.to_string(),
            path: path.to_string(),
            name: name.to_string(),
            module: None,
            compiled_files: Vec::new(),
            imports: BTreeMap::new(),
            is_intermediate_test_variant: false,
        }
    }

    pub fn with_module(mut self, module_path: &str) -> Self {
        self.module = Some(PackageModule {
            path: module_path.to_string(),
            version: String::new(),
            dir: None,
        });
        self
    }

    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.compiled_files = files.iter().map(PathBuf::from).collect();
        self
    }

    /// Adds direct imports whose package ids equal their import paths.
    pub fn with_imports(mut self, imports: &[&str]) -> Self {
        for path in imports {
            self.imports.insert(path.to_string(), path.to_string());
        }
        self
    }

    pub fn module_path(&self) -> &str {
        self.module.as_ref().map(|m| m.path.as_str()).unwrap_or("")
    }
}

/// One entry of a `ListModulePackages` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub path: String,
    pub name: String,
    pub file_count: usize,
    pub is_test: bool,
}

/// Result of `ListModulePackages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageListing {
    pub module_path: String,
    pub packages: Vec<PackageSummary>,
}

/// A forward dependency of the target package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub path: String,
    pub name: String,
    pub module: String,
    pub is_stdlib: bool,
    pub is_external: bool,
    /// 0 for direct dependencies.
    pub depth: u32,
}

/// A package that imports the target package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentEdge {
    pub path: String,
    pub name: String,
    pub module: String,
    pub is_test: bool,
}

/// Result of `ResolveDependencyGraph`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub package: String,
    pub dependencies: Vec<DependencyEdge>,
    pub dependents: Vec<DependentEdge>,
}

// ---------------------------------------------------------------------------
// Symbols
// ---------------------------------------------------------------------------

/// Kind of an exported symbol. Only methods carry a receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method { receiver: String },
    Struct,
    Interface,
    Variable,
    Constant,
    Field,
    Other,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method { .. } => "method",
            SymbolKind::Struct => "struct",
            SymbolKind::Interface => "interface",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Field => "field",
            SymbolKind::Other => "other",
        }
    }
}

/// An exported symbol produced by the backend's document-symbol extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(flatten)]
    pub kind: SymbolKind,
    pub signature: String,
    pub doc: Option<String>,
    pub body: Option<String>,
    pub file_path: String,
    pub line: u32,
}

impl Symbol {
    /// The method receiver, if this symbol is a method.
    pub fn receiver(&self) -> Option<&str> {
        match &self.kind {
            SymbolKind::Method { receiver } => Some(receiver),
            _ => None,
        }
    }
}

/// Selects symbols by exact name and, for methods, by receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFilter {
    pub name: String,
    /// Empty matches any receiver.
    #[serde(default)]
    pub receiver: String,
}

impl SymbolFilter {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            receiver: String::new(),
        }
    }

    pub fn method(name: &str, receiver: &str) -> Self {
        Self {
            name: name.to_string(),
            receiver: receiver.to_string(),
        }
    }
}

/// Result of `FilterSymbols`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolListing {
    pub package: String,
    pub symbols: Vec<Symbol>,
}

// ---------------------------------------------------------------------------
// Operation options
// ---------------------------------------------------------------------------

/// Options for `ListModules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListModulesOptions {
    pub dir: Option<PathBuf>,
    /// Falls back to the configured default when unset.
    pub direct_only: Option<bool>,
}

/// Options for `ListModulePackages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPackagesOptions {
    pub dir: Option<PathBuf>,
    /// Defaults to the main module.
    pub module_path: Option<String>,
    pub exclude_tests: bool,
    pub exclude_internal: bool,
    pub top_level_only: bool,
}

/// Options for `ResolveDependencyGraph`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyGraphOptions {
    pub dir: Option<PathBuf>,
    /// Defaults to the main module's root package.
    pub package_path: Option<String>,
    pub include_transitive: bool,
    /// Zero or negative means unbounded.
    pub max_depth: i32,
}

/// Options for `FilterSymbols`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSymbolsOptions {
    pub dir: Option<PathBuf>,
    pub package_path: String,
    pub filters: Vec<SymbolFilter>,
    pub include_docs: bool,
    pub include_bodies: bool,
}
