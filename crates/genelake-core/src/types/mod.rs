//! Typed field values and rows produced by schema coercion.

pub mod value;

pub use value::{FieldValue, Row};
