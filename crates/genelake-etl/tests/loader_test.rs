//! Loader tests: header mapping, row skipping, batching, append semantics.

use std::cell::Cell;

use genelake_core::errors::{LoadError, RowError, RowTypeError, StorageError};
use genelake_core::schema::TableSchema;
use genelake_core::traits::TableStore;
use genelake_core::types::{FieldValue, Row};
use genelake_etl::{load_table, LoadOptions, Loader};
use genelake_storage::queries::{count_rows, sample_rows, table_summary};
use genelake_storage::DatabaseManager;

const INDIVIDUALS_HEADER: &str =
    "id,name,gender,birth_date,location,collection_date,coverage,consent";

fn individuals_csv(rows: &[&str]) -> String {
    let mut csv = String::from(INDIVIDUALS_HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv
}

fn five_individuals_one_bad_coverage() -> String {
    individuals_csv(&[
        "I1,Ada Lovelace,Female,1815-12-10,London,2020-01-05,30.5,true",
        "I2,Alan Turing,Male,1912-06-23,Wilmslow,2020-01-06,28.0,yes",
        "I3,Grace Hopper,Female,1906-12-09,New York,2020-01-07,abc,true",
        "I4,Kim Doe,Other,1990-03-01,Oslo,2020-01-08,31.2,false",
        "I5,Lee Roe,male,1985-07-19,Lima,2020-01-09 00:00:00,29.9,0",
    ])
}

fn memory_store() -> DatabaseManager {
    DatabaseManager::open_in_memory().unwrap()
}

fn column<'a>(row: &'a [(String, FieldValue)], name: &str) -> &'a FieldValue {
    &row.iter().find(|(c, _)| c == name).unwrap().1
}

#[test]
fn test_non_numeric_coverage_skips_exactly_that_row() {
    let db = memory_store();
    let csv = five_individuals_one_bad_coverage();

    let summary = load_table(&db, csv.as_bytes(), "individuals", 1000).unwrap();

    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.rows_written, 4);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.batches, 1);
    assert_eq!(
        summary.row_errors,
        vec![RowError::Type(RowTypeError {
            row: 3,
            column: "coverage".to_string(),
            value: "abc".to_string(),
            expected: "non-null float".to_string(),
        })]
    );
    assert_eq!(count_rows(&db, "individuals").unwrap(), 4);

    let ids: Vec<FieldValue> = sample_rows(&db, "individuals", 10)
        .unwrap()
        .iter()
        .map(|row| column(row, "id").clone())
        .collect();
    assert_eq!(
        ids,
        ["I1", "I2", "I4", "I5"]
            .map(|id| FieldValue::Text(id.to_string()))
            .to_vec()
    );
}

#[test]
fn test_accounting_identity() {
    let db = memory_store();
    let csv = individuals_csv(&[
        "I1,A,Female,1980-01-01,X,2020-01-01,1.0,true",
        "I2,B,Unknown,1980-01-01,X,2020-01-01,1.0,true",
        "I3,C,Male,not-a-date,X,2020-01-01,1.0,true",
        "I4,D,Male,1980-01-01,X,2020-01-01,1.0,perhaps",
        "I5,E,Male,1980-01-01,X,2020-01-01,1.0,true",
    ]);

    let summary = load_table(&db, csv.as_bytes(), "individuals", 2).unwrap();

    assert_eq!(summary.rows_written, summary.rows_read - summary.rows_skipped);
    assert_eq!(summary.rows_skipped, 3);
    let failing: Vec<(usize, Option<&str>)> = summary
        .row_errors
        .iter()
        .map(|e| (e.row(), e.column()))
        .collect();
    assert_eq!(
        failing,
        vec![(2, Some("gender")), (3, Some("birth_date")), (4, Some("consent"))]
    );
}

#[test]
fn test_date_with_trailing_junk_is_skipped() {
    let db = memory_store();
    let csv = individuals_csv(&[
        "I1,A,Female,1980-01-01,X,2020-01-01T09:15:00,1.0,true",
        "I2,B,Male,1980-01-01 garbage,X,2020-01-01,1.0,true",
    ]);

    let summary = load_table(&db, csv.as_bytes(), "individuals", 10).unwrap();

    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.row_errors[0].row(), 2);
    assert_eq!(summary.row_errors[0].column(), Some("birth_date"));
}

#[test]
fn test_first_failing_column_is_reported() {
    let db = memory_store();
    let csv = individuals_csv(&["I1,A,Robot,1980-01-01,X,2020-01-01,high,true"]);

    let summary = load_table(&db, csv.as_bytes(), "individuals", 10).unwrap();
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.row_errors[0].column(), Some("gender"));
}

#[test]
fn test_loading_twice_doubles_rows() {
    let db = memory_store();
    let csv = five_individuals_one_bad_coverage();

    load_table(&db, csv.as_bytes(), "individuals", 1000).unwrap();
    load_table(&db, csv.as_bytes(), "individuals", 1000).unwrap();

    assert_eq!(count_rows(&db, "individuals").unwrap(), 8);
}

#[test]
fn test_missing_required_column_is_schema_mismatch() {
    let db = memory_store();
    let csv = "id,name,gender,birth_date,location,collection_date,consent\n\
               I1,A,Male,1980-01-01,X,2020-01-01,true\n";

    let err = load_table(&db, csv.as_bytes(), "individuals", 1000).unwrap_err();
    match err {
        LoadError::SchemaMismatch { table, mismatch } => {
            assert_eq!(table, "individuals");
            assert_eq!(mismatch.missing, vec!["coverage"]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
    assert_eq!(count_rows(&db, "individuals").unwrap(), 0);
}

#[test]
fn test_extra_or_duplicated_columns_are_schema_mismatch() {
    let db = memory_store();

    let extra = "parent_id,child_id,note\nI1,I2,adopted\n";
    let err = load_table(&db, extra.as_bytes(), "relationships", 10).unwrap_err();
    assert!(
        matches!(&err, LoadError::SchemaMismatch { mismatch, .. } if mismatch.unexpected == vec!["note"])
    );

    let duplicated = "parent_id,child_id,child_id\nI1,I2,I3\n";
    let err = load_table(&db, duplicated.as_bytes(), "relationships", 10).unwrap_err();
    assert!(
        matches!(&err, LoadError::SchemaMismatch { mismatch, .. } if mismatch.duplicated == vec!["child_id"])
    );
    assert_eq!(count_rows(&db, "relationships").unwrap(), 0);
}

#[test]
fn test_permuted_header_maps_by_name() {
    let db = memory_store();
    let csv = "child_id,parent_id\nC1,P1\n";

    load_table(&db, csv.as_bytes(), "relationships", 10).unwrap();

    let rows = sample_rows(&db, "relationships", 1).unwrap();
    assert_eq!(column(&rows[0], "parent_id"), &FieldValue::Text("P1".into()));
    assert_eq!(column(&rows[0], "child_id"), &FieldValue::Text("C1".into()));
}

#[test]
fn test_batch_size_does_not_change_contents() {
    let csv = five_individuals_one_bad_coverage();

    let one = memory_store();
    let summary_one = load_table(&one, csv.as_bytes(), "individuals", 1).unwrap();
    let thousand = memory_store();
    let summary_thousand = load_table(&thousand, csv.as_bytes(), "individuals", 1000).unwrap();

    assert_eq!(summary_one.batches, 4);
    assert_eq!(summary_thousand.batches, 1);
    assert_eq!(summary_one.rows_written, summary_thousand.rows_written);
    assert_eq!(
        sample_rows(&one, "individuals", 100).unwrap(),
        sample_rows(&thousand, "individuals", 100).unwrap()
    );
}

#[test]
fn test_final_partial_batch_is_flushed() {
    let db = memory_store();
    let csv = "snp_id,chromosome,position,alleles,frequency\n\
               rs1,1,100,A/G,0.1\n\
               rs2,1,200,C/T,0.2\n\
               rs3,2,300,A/T,0.3\n\
               rs4,2,400,G/C,0.4\n\
               rs5,X,500,A/C,0.5\n";

    let summary = load_table(&db, csv.as_bytes(), "snp_definitions", 2).unwrap();
    assert_eq!(summary.batches, 3);
    assert_eq!(count_rows(&db, "snp_definitions").unwrap(), 5);
}

#[test]
fn test_genotypes_without_definitions_are_written_as_is() {
    let db = memory_store();
    let csv = "individual_id,snp_id,allele_pair\nI1,rs999,A/G\nI2,rs999,G/G\n";

    let summary = load_table(&db, csv.as_bytes(), "genotypes", 1000).unwrap();

    assert_eq!(summary.rows_written, 2);
    assert_eq!(count_rows(&db, "genotypes").unwrap(), 2);
    assert_eq!(count_rows(&db, "snp_definitions").unwrap(), 0);
}

#[test]
fn test_null_tokens_in_nullable_columns() {
    let db = memory_store();
    let csv = "partner1_id,partner2_id,marriage_date,divorce_date\n\
               I1,I2,2001-06-01,\n\
               I3,I4,1999-02-14,NA\n\
               I5,I6,2005-09-09,2010-01-01\n\
               I7,,2005-09-09,\n";

    let summary = load_table(&db, csv.as_bytes(), "marriages", 10).unwrap();

    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.row_errors[0].row(), 4);
    assert_eq!(summary.row_errors[0].column(), Some("partner2_id"));

    let rows = sample_rows(&db, "marriages", 10).unwrap();
    assert_eq!(column(&rows[0], "divorce_date"), &FieldValue::Null);
    assert_eq!(column(&rows[1], "divorce_date"), &FieldValue::Null);
    assert!(column(&rows[2], "divorce_date").as_date().is_some());
}

#[test]
fn test_enumerations_are_stored_in_declared_spelling() {
    let db = memory_store();
    let csv = "individual_id,smoking,alcohol,exercise,occupation\n\
               I1,NEVER,Light,moderate,Engineer\n\
               I2,sometimes,none,none,\n";

    let summary = load_table(&db, csv.as_bytes(), "lifestyle", 10).unwrap();
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.row_errors[0].column(), Some("smoking"));

    let rows = sample_rows(&db, "lifestyle", 10).unwrap();
    assert_eq!(column(&rows[0], "smoking"), &FieldValue::Text("never".into()));
    assert_eq!(column(&rows[0], "alcohol"), &FieldValue::Text("light".into()));
}

#[test]
fn test_malformed_records_are_skipped() {
    let db = memory_store();
    let csv = "parent_id,child_id\nP1,C1\nP2\nP3,C3,extra\nP4,C4\n";

    let summary = load_table(&db, csv.as_bytes(), "relationships", 10).unwrap();

    assert_eq!(summary.rows_read, 4);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.rows_skipped, 2);
    assert!(matches!(summary.row_errors[0], RowError::Malformed { row: 2, .. }));
    assert!(matches!(summary.row_errors[1], RowError::Malformed { row: 3, .. }));
}

#[test]
fn test_invalid_utf8_row_is_skipped() {
    let db = memory_store();
    let mut csv = b"parent_id,child_id\nP1,C1\n".to_vec();
    csv.extend_from_slice(b"P\xff\xfe,C2\n");
    csv.extend_from_slice(b"P3,C3\n");

    let summary = load_table(&db, csv.as_slice(), "relationships", 10).unwrap();

    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_written, 2);
    assert!(matches!(summary.row_errors[0], RowError::Malformed { row: 2, .. }));
}

#[test]
fn test_empty_source_is_not_a_failure() {
    let db = memory_store();

    let summary = load_table(&db, "".as_bytes(), "genotypes", 10).unwrap();

    assert!(summary.empty_source);
    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.batches, 0);
    let genotypes = &table_summary(&db).unwrap()[4];
    assert_eq!(genotypes.table, "genotypes");
    assert!(!genotypes.exists);
}

#[test]
fn test_header_only_source_creates_empty_table() {
    let db = memory_store();

    let summary = load_table(&db, "parent_id,child_id\n".as_bytes(), "relationships", 10).unwrap();

    assert!(!summary.empty_source);
    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.batches, 0);
    assert!(table_summary(&db).unwrap()[1].exists);
}

#[test]
fn test_zero_batch_size_is_rejected_before_reading() {
    let db = memory_store();
    let csv = five_individuals_one_bad_coverage();

    let err = load_table(&db, csv.as_bytes(), "individuals", 0).unwrap_err();
    assert!(matches!(err, LoadError::InvalidBatchSize));
    assert!(!table_summary(&db).unwrap()[0].exists);
}

#[test]
fn test_unknown_table_is_rejected() {
    let db = memory_store();
    let err = load_table(&db, "a,b\n1,2\n".as_bytes(), "people", 10).unwrap_err();
    assert!(matches!(err, LoadError::UnknownTable { name } if name == "people"));
}

#[test]
fn test_header_whitespace_and_bom_are_ignored() {
    let db = memory_store();
    let csv = "\u{feff}parent_id , child_id\nP1,C1\n";

    let summary = load_table(&db, csv.as_bytes(), "relationships", 10).unwrap();
    assert_eq!(summary.rows_written, 1);
}

#[test]
fn test_custom_delimiter() {
    let db = memory_store();
    let loader = Loader::new(
        &db,
        LoadOptions {
            batch_size: 10,
            delimiter: b';',
            validate_invariants: false,
        },
    );

    let summary = loader
        .load_table("individual_id;indel_id;state\nI1;ind1;0/1\n".as_bytes(), "indel_genotypes")
        .unwrap();
    assert_eq!(summary.rows_written, 1);
}

#[test]
fn test_invariant_checks_are_opt_in() {
    let csv = individuals_csv(&[
        "I1,A,Female,1980-01-01,X,2020-01-01,1.0,true",
        "I2,B,Female,2021-01-01,X,2020-01-01,1.0,true",
    ]);

    let lenient = memory_store();
    let summary = load_table(&lenient, csv.as_bytes(), "individuals", 10).unwrap();
    assert_eq!(summary.rows_written, 2);

    let strict = memory_store();
    let loader = Loader::new(
        &strict,
        LoadOptions {
            batch_size: 10,
            validate_invariants: true,
            ..Default::default()
        },
    );
    let summary = loader.load_table(csv.as_bytes(), "individuals").unwrap();
    assert_eq!(summary.rows_written, 1);
    assert_eq!(summary.rows_skipped, 1);
    assert!(matches!(summary.row_errors[0], RowError::Invariant { row: 2, .. }));
}

#[test]
fn test_missing_file_is_file_not_found() {
    let db = memory_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("individuals.csv");

    let err = Loader::new(&db, LoadOptions::default())
        .load_file(&path, "individuals")
        .unwrap_err();
    assert!(matches!(err, LoadError::FileNotFound { path: p } if p == path));
}

/// A store that rejects the n-th batch and delegates everything else.
struct RejectingStore {
    inner: DatabaseManager,
    reject_batch: usize,
    batches_seen: Cell<usize>,
}

impl TableStore for RejectingStore {
    fn create_table(&self, schema: &TableSchema) -> Result<(), StorageError> {
        self.inner.create_table(schema)
    }

    fn insert_batch(&self, table: &str, rows: &[Row]) -> Result<usize, StorageError> {
        let n = self.batches_seen.get() + 1;
        self.batches_seen.set(n);
        if n == self.reject_batch {
            return Err(StorageError::StoreWrite {
                table: table.to_string(),
                message: "disk full".to_string(),
            });
        }
        self.inner.insert_batch(table, rows)
    }
}

#[test]
fn test_rejected_batch_aborts_remaining_batches() {
    let store = RejectingStore {
        inner: memory_store(),
        reject_batch: 2,
        batches_seen: Cell::new(0),
    };
    let csv = "parent_id,child_id\nP1,C1\nP2,C2\nP3,C3\nP4,C4\nP5,C5\n";

    let err = load_table(&store, csv.as_bytes(), "relationships", 2).unwrap_err();

    assert!(matches!(err, LoadError::Store(StorageError::StoreWrite { .. })));
    assert_eq!(store.batches_seen.get(), 2);
    assert_eq!(count_rows(&store.inner, "relationships").unwrap(), 2);
}
