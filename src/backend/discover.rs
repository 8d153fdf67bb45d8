use std::fs;
use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::config::{is_excluded, ModGraphConfig};
use crate::errors::Result;
use crate::manifest::ManifestFile;

/// Finds every manifest under `root`.
///
/// Hidden directories and configured exclude patterns are skipped. The root
/// manifest, when present, comes first; the rest follow sorted by path.
/// Unreadable files are logged and skipped.
pub fn discover_manifests(root: &Path, config: &ModGraphConfig) -> Result<Vec<ManifestFile>> {
    let mut root_manifest: Option<ManifestFile> = None;
    let mut members: Vec<ManifestFile> = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| {
        let name = e.file_name().to_string_lossy();
        e.depth() == 0 || !name.starts_with('.')
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != config.manifest_name.as_str() {
            continue;
        }

        let path = entry.path();
        let relative = match path.strip_prefix(root) {
            Ok(r) => r.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        if is_excluded(&relative, config) {
            continue;
        }

        let content = match fs::read(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable manifest");
                continue;
            }
        };

        let file = ManifestFile::new(path, content);
        if relative == config.manifest_name {
            root_manifest = Some(file);
        } else {
            members.push(file);
        }
    }

    members.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(root_manifest.into_iter().chain(members).collect())
}
