//! Error types shared across the crate.

use std::path::PathBuf;

use crate::validate::ValidationErrors;

/// Failures surfaced by controller operations. None of them leave the
/// collection partially modified.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("'{0}' matches {1} tasks; use a longer id prefix")]
    Ambiguous(String, usize),
}

/// Failures while reading or writing a storage slot.
///
/// The persistence adapter logs these and degrades to defaults; only the
/// `try_*` methods hand them to callers.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage i/o error on '{key}': {source}")]
    Io {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("corrupt data in '{key}': {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate task id in '{key}': {id}")]
    DuplicateId { key: &'static str, id: String },
    #[error("invalid task {id} in '{key}': {reason}")]
    InvalidTask {
        key: &'static str,
        id: String,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a data directory; pass --data-dir or set TASKFLOW_DATA_DIR")]
    NoDataDir,
    #[error("failed to create data directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of a single CLI invocation. Printed as `error: <message>`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open data directory: {0}")]
    Store(#[from] std::io::Error),
    #[error("could not understand due date '{0}' (try 'tomorrow', 'in 3d', 'friday' or YYYY-MM-DD)")]
    InvalidDue(String),
    #[error("nothing to update; pass at least one field")]
    NothingToUpdate,
}
