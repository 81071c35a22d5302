//! File-level load errors. Any of these aborts the load of one file.

use std::path::PathBuf;

use super::error_code::{self, LakeErrorCode};
use super::StorageError;
use crate::schema::HeaderMismatch;

/// Errors that abort the load of a single source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("read failed for table {table}: {message}")]
    Read { table: String, message: String },

    #[error("header does not match schema for table {table}: {mismatch}")]
    SchemaMismatch {
        table: String,
        mismatch: HeaderMismatch,
    },

    #[error("batch size must be greater than 0")]
    InvalidBatchSize,

    #[error("unknown table: {name}")]
    UnknownTable { name: String },

    #[error(transparent)]
    Store(#[from] StorageError),
}

impl LakeErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => error_code::FILE_NOT_FOUND,
            Self::Io { .. } | Self::Read { .. } => error_code::IO_ERROR,
            Self::SchemaMismatch { .. } => error_code::SCHEMA_MISMATCH,
            Self::InvalidBatchSize => error_code::INVALID_ARGUMENT,
            Self::UnknownTable { .. } => error_code::UNKNOWN_TABLE,
            Self::Store(e) => e.error_code(),
        }
    }
}
