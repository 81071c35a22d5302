//! Store errors.

use super::error_code::{self, LakeErrorCode};

/// Errors raised by a `TableStore` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The connection could not be established.
    #[error("store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// A batch was rejected; nothing from that batch was committed.
    #[error("store rejected batch for table {table}: {message}")]
    StoreWrite { table: String, message: String },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("unknown table: {name}")]
    UnknownTable { name: String },
}

impl LakeErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable { .. } => error_code::STORE_UNAVAILABLE,
            Self::StoreWrite { .. } => error_code::STORE_WRITE,
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::UnknownTable { .. } => error_code::UNKNOWN_TABLE,
        }
    }
}
