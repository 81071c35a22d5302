//! Core types, table schemas, errors, config and tracing for the genelake loader.

pub mod config;
pub mod errors;
pub mod schema;
pub mod tracing;
pub mod traits;
pub mod types;
