use thiserror::Error;

/// Errors that can occur while resolving workspace modules, packages and symbols.
#[derive(Error, Debug)]
pub enum ModGraphError {
    /// A requested package or module is absent from the metadata graph.
    #[error("{kind} not found: {path}")]
    NotFound { kind: String, path: String },

    /// The workspace has no parseable manifest.
    #[error("no go.mod found in workspace (dir: {dir})")]
    NoManifest { dir: String },

    /// The caller violated an operation precondition.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("parse error: {message} (path: {path}, line: {line:?})")]
    Parse {
        message: String,
        path: String,
        line: Option<u32>,
    },

    #[error("backend error: {message}")]
    Backend { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModGraphError {
    pub fn package_not_found(path: &str) -> Self {
        Self::NotFound {
            kind: "package".to_string(),
            path: path.to_string(),
        }
    }

    pub fn module_not_found(path: &str) -> Self {
        Self::NotFound {
            kind: "module".to_string(),
            path: path.to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Convenience alias for results using `ModGraphError`.
pub type Result<T> = std::result::Result<T, ModGraphError>;
