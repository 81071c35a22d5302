//! Connection manager tests: file-backed stores, pragmas, read pool.

use genelake_core::errors::{LakeErrorCode, StorageError};
use genelake_core::schema::Entity;
use genelake_core::traits::TableStore;
use genelake_core::types::FieldValue;
use genelake_storage::queries::count_rows;
use genelake_storage::DatabaseManager;

#[test]
fn test_file_store_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lake.db");
    let db = DatabaseManager::open(&path).unwrap();

    let mode: String = db
        .with_writer(|conn| {
            conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
                .map_err(|e| StorageError::SqliteError {
                    message: e.to_string(),
                })
        })
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
    assert_eq!(db.path(), Some(path.as_path()));
}

#[test]
fn test_readers_are_query_only() {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open(&dir.path().join("lake.db")).unwrap();

    let result = db.with_reader(|conn| {
        conn.execute_batch("CREATE TABLE scratch (x INTEGER)")
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })
    });
    assert!(result.is_err());
}

#[test]
fn test_readers_see_committed_batches() {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open_with_pool_size(&dir.path().join("lake.db"), 2).unwrap();
    let schema = Entity::Relationship.schema();
    db.create_table(schema).unwrap();

    let rows = vec![
        vec![FieldValue::Text("I1".into()), FieldValue::Text("I2".into())],
        vec![FieldValue::Text("I1".into()), FieldValue::Text("I3".into())],
    ];
    db.insert_batch("relationships", &rows).unwrap();

    // Round-robin: every pooled reader sees the commit.
    for _ in 0..4 {
        assert_eq!(count_rows(&db, "relationships").unwrap(), 2);
    }
}

#[test]
fn test_unreachable_path_is_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("lake.db");

    let err = match DatabaseManager::open(&path) {
        Ok(_) => panic!("expected open to fail"),
        Err(e) => e,
    };
    assert!(matches!(err, StorageError::StoreUnavailable { .. }));
    assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
}

#[test]
fn test_reopen_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lake.db");
    {
        let db = DatabaseManager::open(&path).unwrap();
        db.create_table(Entity::Relationship.schema()).unwrap();
        db.insert_batch(
            "relationships",
            &[vec![FieldValue::Text("A".into()), FieldValue::Text("B".into())]],
        )
        .unwrap();
    }
    let db = DatabaseManager::open(&path).unwrap();
    assert_eq!(count_rows(&db, "relationships").unwrap(), 1);
}

#[test]
fn test_locked_database_rejects_batch_as_store_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lake.db");
    let db = DatabaseManager::open(&path).unwrap();
    db.create_table(Entity::Relationship.schema()).unwrap();
    db.with_writer(|conn| {
        conn.busy_timeout(std::time::Duration::from_millis(50))
            .map_err(|e| StorageError::SqliteError {
                message: e.to_string(),
            })
    })
    .unwrap();

    // Another writer holds the database lock for the whole insert.
    let other = rusqlite::Connection::open(&path).unwrap();
    other.execute_batch("BEGIN IMMEDIATE").unwrap();

    let err = db
        .insert_batch(
            "relationships",
            &[vec![FieldValue::Text("A".into()), FieldValue::Text("B".into())]],
        )
        .unwrap_err();
    other.execute_batch("ROLLBACK").unwrap();

    assert!(matches!(&err, StorageError::StoreWrite { table, .. } if table == "relationships"));
    assert_eq!(err.error_code(), "STORE_WRITE");
    assert_eq!(count_rows(&db, "relationships").unwrap(), 0);
}
