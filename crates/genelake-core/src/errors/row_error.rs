//! Row-level errors. These are recovered by the loader: the row is skipped,
//! logged and counted, and loading continues.

use serde::Serialize;

use super::error_code::{self, LakeErrorCode};

/// A single field failed coercion to its declared type.
///
/// `row` is the 1-based index of the data row (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("row {row}: column `{column}` expected {expected}, got {value:?}")]
pub struct RowTypeError {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub expected: String,
}

/// Why a data row was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowError {
    #[error(transparent)]
    Type(#[from] RowTypeError),

    #[error("row {row}: malformed record: {message}")]
    Malformed { row: usize, message: String },

    #[error("row {row}: {rule} violated: {detail}")]
    Invariant {
        row: usize,
        rule: &'static str,
        detail: String,
    },
}

impl RowError {
    /// The 1-based data row index the error refers to.
    pub fn row(&self) -> usize {
        match self {
            Self::Type(e) => e.row,
            Self::Malformed { row, .. } | Self::Invariant { row, .. } => *row,
        }
    }

    /// The offending column, when the failure is tied to one field.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Type(e) => Some(&e.column),
            _ => None,
        }
    }
}

impl LakeErrorCode for RowTypeError {
    fn error_code(&self) -> &'static str {
        error_code::ROW_TYPE_ERROR
    }
}

impl LakeErrorCode for RowError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Type(e) => e.error_code(),
            Self::Malformed { .. } => error_code::MALFORMED_ROW,
            Self::Invariant { .. } => error_code::INVARIANT_VIOLATION,
        }
    }
}
