use std::collections::HashSet;

use tracing::debug;

use crate::graph::paths::{common_prefix_segments, has_path_prefix};
use crate::manifest::ResolvedManifests;
use crate::types::{ModuleListing, ModuleRecord};

/// Builds the classified, ordered module list of a workspace from its
/// resolved manifests.
#[derive(Debug, Clone)]
pub struct ModuleGraphBuilder {
    direct_only: bool,
}

impl Default for ModuleGraphBuilder {
    fn default() -> Self {
        Self { direct_only: true }
    }
}

impl ModuleGraphBuilder {
    /// Creates a builder that drops indirect requirements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether requirements flagged `// indirect` are dropped.
    pub fn direct_only(mut self, direct_only: bool) -> Self {
        self.direct_only = direct_only;
        self
    }

    /// Merges, classifies and orders the modules of `resolved`.
    pub fn build(&self, resolved: &ResolvedManifests) -> ModuleListing {
        let records = self.merge(resolved);
        let main = resolved.main_module.as_str();

        let (mut internal, mut external): (Vec<ModuleRecord>, Vec<ModuleRecord>) =
            records.into_iter().partition(|m| is_internal(m, main));

        external.sort_by(|a, b| a.path.cmp(&b.path));
        internal.sort_by(|a, b| {
            b.is_main
                .cmp(&a.is_main)
                .then_with(|| {
                    let shared_a = common_prefix_segments(&a.path, main);
                    let shared_b = common_prefix_segments(&b.path, main);
                    shared_b.cmp(&shared_a)
                })
                .then_with(|| a.path.cmp(&b.path))
        });

        debug!(
            main = %main,
            internal = internal.len(),
            external = external.len(),
            "built module listing"
        );

        ModuleListing {
            main_module: resolved.main_module.clone(),
            internal,
            external,
        }
    }

    /// Turns requirements and module replaces into one deduplicated record list.
    ///
    /// A module superseded by a module-to-module replace is kept next to its
    /// replacement; the replacement carries `replaces = old path`.
    pub fn merge(&self, resolved: &ResolvedManifests) -> Vec<ModuleRecord> {
        let main = &resolved.main_module;
        let mut records = vec![ModuleRecord {
            path: main.clone(),
            version: String::new(),
            is_main: true,
            is_indirect: false,
            replaces: None,
            local_file_path: Some(resolved.main_dir.clone()),
        }];
        let mut present: HashSet<String> = HashSet::new();
        present.insert(main.clone());
        let mut dropped: HashSet<&str> = HashSet::new();

        for req in &resolved.requirements {
            if present.contains(&req.path) {
                continue;
            }
            if self.direct_only && req.indirect {
                dropped.insert(&req.path);
                continue;
            }
            present.insert(req.path.clone());
            records.push(ModuleRecord {
                path: req.path.clone(),
                version: req.version.clone(),
                is_main: false,
                is_indirect: req.indirect,
                replaces: None,
                local_file_path: resolved.local_replaces.get(&req.path).cloned(),
            });
        }

        for (old_path, rep) in &resolved.module_replaces {
            if present.contains(&rep.new_path) || dropped.contains(old_path.as_str()) {
                continue;
            }
            let is_indirect = resolved
                .requirements
                .iter()
                .find(|r| &r.path == old_path)
                .map(|r| r.indirect)
                .unwrap_or(false);
            present.insert(rep.new_path.clone());
            records.push(ModuleRecord {
                path: rep.new_path.clone(),
                version: rep.new_version.clone(),
                is_main: false,
                is_indirect,
                replaces: Some(old_path.clone()),
                local_file_path: resolved.local_replaces.get(&rep.new_path).cloned(),
            });
        }

        records
    }
}

/// A module is internal when it is the main module, lives under the main
/// module path, or resolves to a local directory.
pub fn is_internal(module: &ModuleRecord, main_module: &str) -> bool {
    module.is_main
        || has_path_prefix(&module.path, main_module)
        || module.local_file_path.is_some()
}
