//! `TableStore` implementation: DDL on demand, one transaction per batch.

use genelake_core::errors::StorageError;
use genelake_core::schema::{schema_for, TableSchema};
use genelake_core::traits::TableStore;
use genelake_core::types::Row;
use rusqlite::params_from_iter;

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::convert::to_sql_value;
use crate::ddl::{create_index_sql, create_table_sql, insert_sql};

impl TableStore for DatabaseManager {
    fn create_table(&self, schema: &TableSchema) -> Result<(), StorageError> {
        let mut ddl = create_table_sql(schema);
        for index in create_index_sql(schema) {
            ddl.push('\n');
            ddl.push_str(&index);
        }
        self.with_writer(|conn| {
            conn.execute_batch(&ddl)
                .map_err(|e| StorageError::StoreWrite {
                    table: schema.name.to_string(),
                    message: format!("create table: {e}"),
                })
        })?;
        tracing::debug!(table = schema.name, "table ready");
        Ok(())
    }

    fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, StorageError> {
        let schema = schema_for(table).ok_or_else(|| StorageError::UnknownTable {
            name: table.to_string(),
        })?;
        if rows.is_empty() {
            return Ok(0);
        }
        let write_err = |message: String| StorageError::StoreWrite {
            table: table.to_string(),
            message,
        };

        self.with_writer(|conn| {
            with_immediate_transaction(conn, |conn| {
                let mut stmt = conn
                    .prepare_cached(&insert_sql(schema))
                    .map_err(|e| write_err(e.to_string()))?;
                for (i, row) in rows.iter().enumerate() {
                    if row.len() != schema.columns.len() {
                        return Err(write_err(format!(
                            "row {} of batch has {} values, table has {} columns",
                            i + 1,
                            row.len(),
                            schema.columns.len()
                        )));
                    }
                    stmt.execute(params_from_iter(row.iter().map(to_sql_value)))
                        .map_err(|e| write_err(format!("row {} of batch: {e}", i + 1)))?;
                }
                Ok(rows.len())
            })
            // BEGIN and COMMIT failures reject the batch too.
            .map_err(|e| match e {
                StorageError::SqliteError { message } => write_err(message),
                other => other,
            })
        })
    }
}
