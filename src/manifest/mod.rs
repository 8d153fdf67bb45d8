//! Module manifest declarations and the parser seam.
//!
//! A manifest parser turns the bytes of one manifest file into a
//! [`Manifest`]; the [`ManifestResolver`] folds any number of those into the
//! workspace-wide view consumed by the module graph builder.

mod gomod;
mod resolver;

pub use gomod::GoModParser;
pub use resolver::{ManifestResolver, ModuleReplace, ResolvedManifests};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Handle to one manifest file of a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Directory containing the manifest.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Parsed declaration of a single manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// The declared module path.
    pub module: String,
    pub requires: Vec<Requirement>,
    pub replaces: Vec<Replace>,
}

/// A `require` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

/// A `replace old [v] => new [v]` entry, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replace {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

/// Turns manifest bytes into a structured declaration.
pub trait ManifestParser {
    fn parse(&self, file: &ManifestFile) -> Result<Manifest>;
}
