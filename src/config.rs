use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{ModGraphError, Result};

/// Name of the configuration file stored inside the `.modgraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding modgraph settings.
pub const MODGRAPH_DIR: &str = ".modgraph";

/// Configuration for resolving a workspace.
///
/// Controls manifest discovery, stdlib classification and response limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModGraphConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Whether module listings drop indirect requirements unless asked otherwise.
    pub direct_only: bool,
    /// Import-path prefixes that are treated as part of the standard library.
    pub stdlib_prefixes: Vec<String>,
    /// Package-name suffix that marks a test package.
    pub test_suffix: String,
    /// File name of a module manifest.
    pub manifest_name: String,
    /// Glob patterns (relative to the workspace root) skipped by manifest discovery.
    pub exclude: Vec<String>,
    /// Maximum character length of a tool response before truncation.
    pub max_response_chars: usize,
}

impl Default for ModGraphConfig {
    fn default() -> Self {
        Self {
            version: 1,
            direct_only: true,
            stdlib_prefixes: vec!["golang.org/x/".to_string()],
            test_suffix: "_test".to_string(),
            manifest_name: "go.mod".to_string(),
            exclude: vec![
                "vendor/**".to_string(),
                ".git/**".to_string(),
                "testdata/**".to_string(),
                "**/testdata/**".to_string(),
                "node_modules/**".to_string(),
                ".modgraph/**".to_string(),
            ],
            max_response_chars: 15_000,
        }
    }
}

/// Returns the path to the `.modgraph` directory within the given workspace root.
pub fn get_modgraph_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(MODGRAPH_DIR)
}

/// Returns the path to the configuration file within the `.modgraph` directory.
pub fn get_config_path(workspace_root: &Path) -> PathBuf {
    get_modgraph_dir(workspace_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// A missing configuration file yields the defaults.
pub fn load_config(workspace_root: &Path) -> Result<ModGraphConfig> {
    let config_path = get_config_path(workspace_root);

    if !config_path.exists() {
        return Ok(ModGraphConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| ModGraphError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    serde_json::from_str(&contents).map_err(|e| ModGraphError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(workspace_root: &Path, config: &ModGraphConfig) -> Result<()> {
    let modgraph_dir = get_modgraph_dir(workspace_root);
    fs::create_dir_all(&modgraph_dir).map_err(|e| ModGraphError::Config {
        message: format!(
            "failed to create modgraph directory '{}': {}",
            modgraph_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(workspace_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| ModGraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| ModGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| ModGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Returns `true` if a workspace-relative path matches one of the configured
/// exclude patterns.
pub fn is_excluded(relative_path: &str, config: &ModGraphConfig) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    config.exclude.iter().any(|pattern_str| {
        Pattern::new(pattern_str)
            .map(|pattern| pattern.matches_with(relative_path, match_opts))
            .unwrap_or(false)
    })
}
