//! Write transactions: BEGIN IMMEDIATE, COMMIT, ROLLBACK on any error.

use genelake_core::errors::StorageError;
use rusqlite::Connection;

/// Execute `f` inside a BEGIN IMMEDIATE transaction.
///
/// The write lock is taken at transaction start. If `f` fails, the
/// transaction is rolled back and the error returned unchanged; nothing
/// written inside `f` survives.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Connection) -> Result<T, StorageError>,
{
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| StorageError::SqliteError {
            message: format!("failed to begin immediate transaction: {e}"),
        })?;

    let result = match f(conn) {
        Ok(value) => value,
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            return Err(e);
        }
    };

    if let Err(e) = conn.execute_batch("COMMIT") {
        if let Err(rollback) = conn.execute_batch("ROLLBACK") {
            tracing::warn!(error = %rollback, "rollback after failed commit failed");
        }
        return Err(StorageError::SqliteError {
            message: format!("failed to commit: {e}"),
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite_err(e: rusqlite::Error) -> StorageError {
        StorageError::SqliteError {
            message: e.to_string(),
        }
    }

    #[test]
    fn failed_commit_rolls_back_and_leaves_connection_usable() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (
                 parent_id INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED
             );",
        )
        .unwrap();

        // The deferred constraint is only checked at COMMIT.
        let err = with_immediate_transaction(&conn, |conn| {
            conn.execute("INSERT INTO child (parent_id) VALUES (7)", [])
                .map_err(sqlite_err)
        })
        .unwrap_err();
        assert!(matches!(err, StorageError::SqliteError { ref message } if message.contains("commit")));

        assert!(conn.is_autocommit());
        let children: i64 = conn
            .query_row("SELECT COUNT(*) FROM child", [], |row| row.get(0))
            .unwrap();
        assert_eq!(children, 0);

        let written = with_immediate_transaction(&conn, |conn| {
            conn.execute("INSERT INTO parent (id) VALUES (7)", [])
                .map_err(sqlite_err)
        })
        .unwrap();
        assert_eq!(written, 1);
    }
}
