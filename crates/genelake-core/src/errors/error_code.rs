//! LakeErrorCode trait: stable, machine-readable codes for every error enum.

/// Every error enum implements this to expose a structured code string,
/// used by the loader binary and the run report.
pub trait LakeErrorCode {
    /// Returns the code string (e.g., "SCHEMA_MISMATCH").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted report string: `[ERROR_CODE] message`.
    fn report_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
pub const IO_ERROR: &str = "IO_ERROR";
pub const SCHEMA_MISMATCH: &str = "SCHEMA_MISMATCH";
pub const ROW_TYPE_ERROR: &str = "ROW_TYPE_ERROR";
pub const MALFORMED_ROW: &str = "MALFORMED_ROW";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const STORE_WRITE: &str = "STORE_WRITE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const UNKNOWN_TABLE: &str = "UNKNOWN_TABLE";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
