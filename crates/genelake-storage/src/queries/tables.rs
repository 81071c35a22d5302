//! Per-table read queries: row counts, leading samples, overview summary.
//!
//! Only the ten known table names are accepted, so table names are never
//! spliced into SQL from caller input.

use genelake_core::errors::StorageError;
use genelake_core::schema::{schema_for, Entity, TableSchema};
use genelake_core::types::FieldValue;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::connection::DatabaseManager;
use crate::convert::from_sql_value;
use crate::ddl::{quote_ident, select_sql};

/// One stored row as ordered `(column, value)` pairs.
pub type SampleRow = Vec<(String, FieldValue)>;

/// Row count for one table. `exists` is false when nothing was ever loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub exists: bool,
    pub rows: u64,
}

fn known_table(table: &str) -> Result<&'static TableSchema, StorageError> {
    schema_for(table).ok_or_else(|| StorageError::UnknownTable {
        name: table.to_string(),
    })
}

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, StorageError> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(sqlite_err)
}

fn count_in(conn: &Connection, schema: &TableSchema) -> Result<TableCount, StorageError> {
    if !table_exists(conn, schema.name)? {
        return Ok(TableCount {
            table: schema.name.to_string(),
            exists: false,
            rows: 0,
        });
    }
    let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(schema.name));
    let rows: i64 = conn.query_row(&sql, [], |row| row.get(0)).map_err(sqlite_err)?;
    Ok(TableCount {
        table: schema.name.to_string(),
        exists: true,
        rows: u64::try_from(rows).unwrap_or(0),
    })
}

/// Number of rows stored in `table` (0 when the table was never created).
pub fn count_rows(db: &DatabaseManager, table: &str) -> Result<u64, StorageError> {
    let schema = known_table(table)?;
    db.with_reader(|conn| count_in(conn, schema).map(|c| c.rows))
}

/// The first `limit` rows of `table` in insertion order.
pub fn sample_rows(
    db: &DatabaseManager,
    table: &str,
    limit: usize,
) -> Result<Vec<SampleRow>, StorageError> {
    let schema = known_table(table)?;
    db.with_reader(|conn| {
        if !table_exists(conn, schema.name)? {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare_cached(&select_sql(schema)).map_err(sqlite_err)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                let mut sample = Vec::with_capacity(schema.columns.len());
                for (i, col) in schema.columns.iter().enumerate() {
                    let value = from_sql_value(row.get_ref(i)?, col.ty);
                    sample.push((col.name.to_string(), value));
                }
                Ok(sample)
            })
            .map_err(sqlite_err)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(sqlite_err)?);
        }
        Ok(result)
    })
}

/// Row counts for all ten tables, in declaration order.
pub fn table_summary(db: &DatabaseManager) -> Result<Vec<TableCount>, StorageError> {
    db.with_reader(|conn| {
        Entity::ALL
            .into_iter()
            .map(|entity| count_in(conn, entity.schema()))
            .collect()
    })
}
