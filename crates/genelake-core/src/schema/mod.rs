//! Schema definitions for the ten data lake tables.
//!
//! Each table declares its ordered columns, their semantic type and
//! nullability, and which columns link to another table. Coercion of raw
//! text fields and header validation both hang off these declarations.

pub mod column;
pub mod header;
pub mod invariants;
pub mod order;
pub mod tables;

pub use column::{ColumnSpec, Reference, SemanticType, NULL_TOKENS};
pub use header::{ColumnMapping, HeaderMismatch};
pub use invariants::check_row_invariants;
pub use order::{load_order, order_subset};
pub use tables::{schema_for, Entity, TableSchema};
