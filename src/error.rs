//! Error types for the rollup engine and its snapshot store.

use std::path::PathBuf;

use crate::task::TaskId;

/// Structural validation failures raised before a parent assignment is accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("Placing the task at depth {depth} exceeds the maximum depth of {max}")]
    DepthExceeded { depth: u32, max: u32 },

    #[error("Task {task} cannot be moved under {parent}: it would become its own ancestor")]
    CircularReference { task: TaskId, parent: TaskId },

    #[error("Parent task {0} does not exist")]
    ParentNotFound(TaskId),

    #[error("Task {0} does not exist")]
    TaskNotFound(TaskId),
}

/// Crate-level error for everything outside the pure engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("Failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
