//! Domain errors for deploy-helper.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, shaping or writing a stack file.
///
/// These are always fatal: the run aborts and nothing is emitted.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read stack file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse stack file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Stack file must contain a mapping at the top level, found {0}")]
    NotAMapping(&'static str),

    #[error("Service names must be strings, found {0}")]
    InvalidServiceName(&'static str),

    #[error("Service '{0}' is defined more than once")]
    DuplicateService(String),

    #[error("Service '{service}' must be a mapping, found {found}")]
    MalformedService { service: String, found: &'static str },

    #[error("Service '{0}' has no usable deploy.labels")]
    MalformedLabels(String),

    #[error("Failed to serialize stack file: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Failed to write output to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type DocumentResult<T> = Result<T, DocumentError>;
