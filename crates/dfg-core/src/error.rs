use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DfgError {
    #[error("not initialized: run 'dfg init' (no config at {0})")]
    NotInitialized(PathBuf),

    #[error("cannot read {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed module layout: {0}")]
    Structure(String),

    #[error("malformed selection: {0}")]
    Encoding(String),

    #[error("invalid selection: {0}")]
    Validation(String),

    #[error("operation failed: {0}")]
    Execution(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DfgError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DfgError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DfgError>;
