//! File-backed entity store.
//!
//! # Responsibility
//! - Hold the process-wide mapping from composite key to entity.
//! - Persist the whole mapping to a single JSON snapshot file and reload it
//!   at startup.
//!
//! # Invariants
//! - A missing storage file is the expected first-run state, never an error.
//! - A present-but-unreadable storage file fails loading with a structured
//!   error instead of masking corrupted state.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::model::task::TaskValidationError;

mod file_store;

pub use file_store::{FileStore, DEFAULT_STORAGE_FILE};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store persistence errors.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Storage file exists but is not a valid snapshot.
    MalformedStorage {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Composite key names an entity kind this build does not register.
    UnknownEntityKind {
        key: String,
    },
    /// A rehydrated entity violates its own invariants.
    InvalidEntity {
        key: String,
        source: TaskValidationError,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "storage i/o failed for `{}`: {source}", path.display())
            }
            Self::MalformedStorage { path, source } => {
                write!(f, "malformed storage file `{}`: {source}", path.display())
            }
            Self::UnknownEntityKind { key } => {
                write!(f, "storage entry `{key}` references an unregistered entity kind")
            }
            Self::InvalidEntity { key, source } => {
                write!(f, "storage entry `{key}` is invalid: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MalformedStorage { source, .. } => Some(source),
            Self::UnknownEntityKind { .. } => None,
            Self::InvalidEntity { source, .. } => Some(source),
        }
    }
}
