use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ManifestFile, ManifestParser, Requirement};
use crate::errors::{ModGraphError, Result};
use crate::graph::paths::{is_local_replace_target, normalize_path};

/// Target of a module-to-module replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReplace {
    pub new_path: String,
    pub new_version: String,
}

/// Workspace-wide manifest state: the main module, every requirement, and
/// the replace directives split by target class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedManifests {
    pub main_module: String,
    pub main_dir: PathBuf,
    /// Deduplicated by path; first declaration wins.
    pub requirements: Vec<Requirement>,
    /// Module path -> directory it resolves to.
    pub local_replaces: BTreeMap<String, PathBuf>,
    /// Old module path -> replacement module.
    pub module_replaces: BTreeMap<String, ModuleReplace>,
    /// Manifests that could not be parsed.
    pub skipped: Vec<PathBuf>,
}

/// Folds the manifests of a workspace into a [`ResolvedManifests`].
///
/// The first manifest that parses declares the main module. Manifests that
/// fail to parse are skipped so a broken secondary module never aborts the
/// rest of the workspace.
pub struct ManifestResolver<'a> {
    parser: &'a dyn ManifestParser,
}

impl<'a> ManifestResolver<'a> {
    pub fn new(parser: &'a dyn ManifestParser) -> Self {
        Self { parser }
    }

    /// Resolves `files` (main manifest first). `workspace_dir` is only used
    /// to describe the workspace in a `NoManifest` error.
    pub fn resolve(
        &self,
        files: &[ManifestFile],
        workspace_dir: &Path,
    ) -> Result<ResolvedManifests> {
        let mut resolved: Option<ResolvedManifests> = None;
        let mut skipped = Vec::new();
        let mut seen_requirements: HashSet<String> = HashSet::new();

        for file in files {
            let manifest = match self.parser.parse(file) {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "skipping unparseable manifest");
                    skipped.push(file.path.clone());
                    continue;
                }
            };
            let manifest_dir = normalize_path(file.dir());

            let state = resolved.get_or_insert_with(|| {
                debug!(module = %manifest.module, dir = %manifest_dir.display(), "main module");
                ResolvedManifests {
                    main_module: manifest.module.clone(),
                    main_dir: manifest_dir.clone(),
                    requirements: Vec::new(),
                    local_replaces: BTreeMap::new(),
                    module_replaces: BTreeMap::new(),
                    skipped: Vec::new(),
                }
            });

            state
                .local_replaces
                .entry(manifest.module.clone())
                .or_insert_with(|| manifest_dir.clone());

            for req in manifest.requires {
                if seen_requirements.insert(req.path.clone()) {
                    state.requirements.push(req);
                }
            }

            for rep in manifest.replaces {
                if is_local_replace_target(&rep.new_path) {
                    let target = if rep.new_path.starts_with('.') {
                        normalize_path(&manifest_dir.join(&rep.new_path))
                    } else {
                        PathBuf::from(&rep.new_path)
                    };
                    state.local_replaces.entry(rep.old_path).or_insert(target);
                } else {
                    state
                        .module_replaces
                        .entry(rep.old_path)
                        .or_insert(ModuleReplace {
                            new_path: rep.new_path,
                            new_version: rep.new_version.unwrap_or_default(),
                        });
                }
            }
        }

        match resolved {
            Some(mut state) => {
                state.skipped = skipped;
                Ok(state)
            }
            None => Err(ModGraphError::NoManifest {
                dir: workspace_dir.display().to_string(),
            }),
        }
    }
}
