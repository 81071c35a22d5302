//! Error handling for genelake.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod load_error;
pub mod row_error;
pub mod run_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::LakeErrorCode;
pub use load_error::LoadError;
pub use row_error::{RowError, RowTypeError};
pub use run_error::RunError;
pub use storage_error::StorageError;
