//! The store interface the loader writes through.

use crate::errors::StorageError;
use crate::schema::TableSchema;
use crate::types::Row;

/// A relational store that accepts whole tables of fixed-shape rows.
///
/// Implementations own the persisted rows. Every `insert_batch` call is one
/// transaction: either all rows of the batch are committed or none are.
pub trait TableStore {
    /// Create the table for `schema` if it does not exist yet. Existing rows are kept.
    fn create_table(&self, schema: &TableSchema) -> Result<(), StorageError>;

    /// Append `rows` (each in the schema's column order) to `table`.
    /// Returns the number of rows written.
    fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, StorageError>;
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn create_table(&self, schema: &TableSchema) -> Result<(), StorageError> {
        (**self).create_table(schema)
    }

    fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, StorageError> {
        (**self).insert_batch(table, rows)
    }
}
