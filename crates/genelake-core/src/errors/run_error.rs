//! Run-level errors: conditions that abort the whole load run.

use std::path::PathBuf;

use super::error_code::{self, LakeErrorCode};
use super::{ConfigError, StorageError};

/// Errors that stop a run before or between files.
/// Per-file failures that do not abort the run are recorded in the run report instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input file for table {table} not found: {path}")]
    FileNotFound { table: String, path: PathBuf },

    #[error("Storage error: {0}")]
    Store(#[from] StorageError),

    #[error("unknown table: {name}")]
    UnknownTable { name: String },
}

impl LakeErrorCode for RunError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::FileNotFound { .. } => error_code::FILE_NOT_FOUND,
            Self::Store(e) => e.error_code(),
            Self::UnknownTable { .. } => error_code::UNKNOWN_TABLE,
        }
    }
}
