use tracing::{debug, info, warn};

use crate::backend::{Backend, Snapshot};
use crate::config::ModGraphConfig;
use crate::errors::{ModGraphError, Result};
use crate::graph::paths::{has_path_segment, is_test_name};
use crate::graph::{ModuleGraphBuilder, PackageGraphNavigator};
use crate::manifest::{ManifestResolver, ResolvedManifests};
use crate::symbols::SymbolFilterEngine;
use crate::types::*;

/// Entry point for the four workspace queries.
///
/// Every query acquires its own snapshot view from the backend and drops it
/// before returning, on success and on error alike.
pub struct Workspace<B: Backend> {
    backend: B,
    config: ModGraphConfig,
}

/// Reads and resolves the manifests of a snapshot view.
pub fn resolve_manifests<S: Snapshot>(view: &S) -> Result<ResolvedManifests> {
    let files = view.manifest_files()?;
    let resolved =
        ManifestResolver::new(view.manifest_parser()).resolve(&files, view.root())?;
    if !resolved.skipped.is_empty() {
        info!(
            skipped = resolved.skipped.len(),
            main = %resolved.main_module,
            "resolved manifests with skipped files"
        );
    }
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl<B: Backend> Workspace<B> {
    /// Creates a workspace over `backend` with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ModGraphConfig::default())
    }

    pub fn with_config(backend: B, config: ModGraphConfig) -> Self {
        Self { backend, config }
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &ModGraphConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl<B: Backend> Workspace<B> {
    /// Lists the main module and its required modules, classified as
    /// internal or external.
    pub fn list_modules(&self, opts: &ListModulesOptions) -> Result<ModuleListing> {
        let view = self.backend.acquire(opts.dir.as_deref())?;
        let resolved = resolve_manifests(&view)?;
        let direct_only = opts.direct_only.unwrap_or(self.config.direct_only);

        Ok(ModuleGraphBuilder::new()
            .direct_only(direct_only)
            .build(&resolved))
    }

    /// Lists the packages that belong to a module (the main module by default).
    pub fn list_module_packages(&self, opts: &ListPackagesOptions) -> Result<PackageListing> {
        let view = self.backend.acquire(opts.dir.as_deref())?;
        let module_path = match &opts.module_path {
            Some(path) if !path.is_empty() => path.clone(),
            _ => resolve_manifests(&view)?.main_module,
        };

        let mut module_known = false;
        let mut packages = Vec::new();
        for pkg in view.metadata().packages() {
            if pkg.module_path() != module_path {
                continue;
            }
            module_known = true;
            if pkg.is_intermediate_test_variant {
                continue;
            }

            let relative = relative_to_module(&pkg.path, &module_path);
            let is_test = is_test_name(&pkg.name, &self.config.test_suffix)
                || pkg.path.ends_with(".test");
            if opts.exclude_tests && is_test {
                continue;
            }
            if opts.exclude_internal && has_path_segment(relative, "internal") {
                continue;
            }
            if opts.top_level_only && relative.contains('/') {
                continue;
            }

            packages.push(PackageSummary {
                path: pkg.path.clone(),
                name: pkg.name.clone(),
                file_count: pkg.compiled_files.len(),
                is_test,
            });
        }

        if !module_known {
            return Err(ModGraphError::module_not_found(&module_path));
        }

        packages.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
        debug!(module = %module_path, packages = packages.len(), "listed module packages");
        Ok(PackageListing {
            module_path,
            packages,
        })
    }

    /// Resolves forward dependencies and reverse dependents of a package
    /// (the main module's root package by default).
    pub fn resolve_dependency_graph(
        &self,
        opts: &DependencyGraphOptions,
    ) -> Result<DependencyGraph> {
        let view = self.backend.acquire(opts.dir.as_deref())?;
        let requested = opts.package_path.as_deref().filter(|p| !p.is_empty());

        let main_module = match resolve_manifests(&view) {
            Ok(resolved) => Some(resolved.main_module),
            Err(ModGraphError::NoManifest { .. }) if requested.is_some() => None,
            Err(e) => return Err(e),
        };
        let package = match (requested, &main_module) {
            (Some(p), _) => p.to_string(),
            (None, Some(main)) => main.clone(),
            (None, None) => {
                return Err(ModGraphError::NoManifest {
                    dir: view.root().display().to_string(),
                })
            }
        };

        let navigator = PackageGraphNavigator::new(view.metadata())
            .with_main_module(main_module.as_deref())
            .with_stdlib_prefixes(&self.config.stdlib_prefixes)
            .with_test_suffix(&self.config.test_suffix);

        let dependencies =
            navigator.dependencies(&package, opts.include_transitive, opts.max_depth)?;
        let dependents = navigator.dependents(&package)?;

        Ok(DependencyGraph {
            package,
            dependencies,
            dependents,
        })
    }

    /// Returns the exported symbols of a package that match any of the filters.
    pub fn filter_symbols(&self, opts: &FilterSymbolsOptions) -> Result<SymbolListing> {
        if opts.package_path.is_empty() {
            return Err(ModGraphError::invalid_argument("package_path is required"));
        }
        if opts.filters.is_empty() {
            return Err(ModGraphError::invalid_argument(
                "at least one symbol filter is required",
            ));
        }

        let view = self.backend.acquire(opts.dir.as_deref())?;
        let pkg = view
            .metadata()
            .package_by_path(&opts.package_path)
            .ok_or_else(|| ModGraphError::package_not_found(&opts.package_path))?;

        let mut symbols = Vec::new();
        for file in &pkg.compiled_files {
            match view.exported_symbols(file) {
                Ok(found) => symbols.extend(found),
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping file without symbols");
                    continue;
                }
            }
        }

        let mut matched = SymbolFilterEngine::new(&opts.filters).filter(symbols);
        for symbol in &mut matched {
            if !opts.include_docs {
                symbol.doc = None;
            }
            if !opts.include_bodies {
                symbol.body = None;
            }
        }

        Ok(SymbolListing {
            package: pkg.path.clone(),
            symbols: matched,
        })
    }
}

/// Package path relative to its module root; the full path when it is not
/// under the module.
fn relative_to_module<'p>(package_path: &'p str, module_path: &str) -> &'p str {
    match package_path.strip_prefix(module_path) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => package_path,
    }
}
