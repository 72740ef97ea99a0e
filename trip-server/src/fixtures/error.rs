//! Errors from loading fixture files.

use std::path::PathBuf;

use crate::domain::DomainError;

/// A fixture file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid entry {id:?} in {file}: {reason}")]
    Invalid {
        file: &'static str,
        id: String,
        #[source]
        reason: DomainError,
    },

    #[error("{file} contains no entries")]
    Empty { file: &'static str },
}
