//! Error types for loading conference data

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid conference data in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DataResult<T> = Result<T, DataError>;
