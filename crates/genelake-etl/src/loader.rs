//! Single-table loader: header mapping, per-field coercion, batched writes.
//!
//! Rows that fail coercion are skipped and counted; they never reach the
//! store. Everything else is buffered and written `batch_size` rows at a
//! time, one transaction per batch, with the remainder flushed at end of
//! input. Loading appends: nothing is truncated or deduplicated.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use csv::{ErrorKind, ReaderBuilder, StringRecord};
use genelake_core::config::LakeConfig;
use genelake_core::config::loader_config::DEFAULT_BATCH_SIZE;
use genelake_core::errors::{LoadError, RowError};
use genelake_core::schema::{check_row_invariants, ColumnMapping, Entity, TableSchema};
use genelake_core::traits::TableStore;
use genelake_core::types::Row;
use serde::Serialize;

/// Row errors kept verbatim in a summary; further ones are only counted.
pub const MAX_RECORDED_ROW_ERRORS: usize = 1_000;

/// Per-load settings, fixed at `Loader` construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub delimiter: u8,
    pub validate_invariants: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: b',',
            validate_invariants: false,
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &LakeConfig) -> Self {
        Self {
            batch_size: config.loader.effective_batch_size(),
            delimiter: config.source.effective_delimiter(),
            validate_invariants: config.loader.effective_validate_invariants(),
        }
    }
}

/// Outcome of loading one source into one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableLoadSummary {
    pub table: String,
    /// Data rows read (header excluded), including skipped ones.
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_skipped: usize,
    /// Batch transactions committed.
    pub batches: usize,
    /// The source had no header row at all.
    pub empty_source: bool,
    /// The first `MAX_RECORDED_ROW_ERRORS` skipped-row errors.
    pub row_errors: Vec<RowError>,
}

/// Loads delimited sources into a `TableStore`.
pub struct Loader<S> {
    store: S,
    options: LoadOptions,
}

impl<S: TableStore> Loader<S> {
    pub fn new(store: S, options: LoadOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open `path` and load it into `table`.
    pub fn load_file(&self, path: &Path, table: &str) -> Result<TableLoadSummary, LoadError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        tracing::info!(path = %path.display(), table, "loading file");
        self.load_table(BufReader::new(file), table)
    }

    /// Load a delimited source into `table`.
    pub fn load_table<R: Read>(&self, source: R, table: &str) -> Result<TableLoadSummary, LoadError> {
        if self.options.batch_size == 0 {
            return Err(LoadError::InvalidBatchSize);
        }
        let entity = Entity::from_table_name(table).ok_or_else(|| LoadError::UnknownTable {
            name: table.to_string(),
        })?;
        let schema = entity.schema();

        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut summary = TableLoadSummary {
            table: table.to_string(),
            ..Default::default()
        };

        let mut header = StringRecord::new();
        if !read_header(&mut reader, &mut header, table)? {
            tracing::warn!(table, "source is empty, skipping");
            summary.empty_source = true;
            return Ok(summary);
        }
        let mapping = schema
            .map_header(header.iter())
            .map_err(|mismatch| LoadError::SchemaMismatch {
                table: table.to_string(),
                mismatch,
            })?;

        self.store.create_table(schema)?;

        let mut batch: Vec<Row> = Vec::with_capacity(self.options.batch_size.min(DEFAULT_BATCH_SIZE));
        let mut record = StringRecord::new();
        loop {
            let row_index = summary.rows_read + 1;
            let parsed = match reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => self.parse_row(entity, schema, &mapping, &record, row_index),
                Err(e) => match e.kind() {
                    ErrorKind::Utf8 { .. } => Err(RowError::Malformed {
                        row: row_index,
                        message: e.to_string(),
                    }),
                    _ => {
                        return Err(LoadError::Read {
                            table: table.to_string(),
                            message: e.to_string(),
                        })
                    }
                },
            };
            summary.rows_read += 1;

            match parsed {
                Ok(row) => {
                    batch.push(row);
                    if batch.len() >= self.options.batch_size {
                        self.flush(table, &mut batch, &mut summary)?;
                    }
                }
                Err(row_error) => {
                    tracing::warn!(table, row = row_error.row(), error = %row_error, "skipping row");
                    summary.rows_skipped += 1;
                    if summary.row_errors.len() < MAX_RECORDED_ROW_ERRORS {
                        summary.row_errors.push(row_error);
                    }
                }
            }
        }
        self.flush(table, &mut batch, &mut summary)?;

        tracing::info!(
            table,
            rows_read = summary.rows_read,
            rows_written = summary.rows_written,
            rows_skipped = summary.rows_skipped,
            batches = summary.batches,
            "finished loading table"
        );
        Ok(summary)
    }

    fn parse_row(
        &self,
        entity: Entity,
        schema: &TableSchema,
        mapping: &ColumnMapping,
        record: &StringRecord,
        row_index: usize,
    ) -> Result<Row, RowError> {
        if record.len() != mapping.source_width() {
            return Err(RowError::Malformed {
                row: row_index,
                message: format!(
                    "expected {} fields, found {}",
                    mapping.source_width(),
                    record.len()
                ),
            });
        }
        let mut row = Vec::with_capacity(schema.columns.len());
        for (schema_index, source_index) in mapping.iter() {
            let raw = record.get(source_index).unwrap_or_default();
            row.push(schema.columns[schema_index].coerce(raw, row_index)?);
        }
        if self.options.validate_invariants {
            check_row_invariants(entity, &row, row_index)?;
        }
        Ok(row)
    }

    fn flush(
        &self,
        table: &str,
        batch: &mut Vec<Row>,
        summary: &mut TableLoadSummary,
    ) -> Result<(), LoadError> {
        if batch.is_empty() {
            return Ok(());
        }
        match self.store.insert_batch(table, batch) {
            Ok(written) => {
                summary.rows_written += written;
                summary.batches += 1;
                tracing::debug!(table, batch = summary.batches, rows = written, "batch committed");
                batch.clear();
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    table,
                    batch = summary.batches + 1,
                    rows_committed = summary.rows_written,
                    error = %e,
                    "batch rejected, aborting table"
                );
                Err(e.into())
            }
        }
    }
}

/// Read the first record as the header. Returns false for an empty source.
fn read_header<R: Read>(
    reader: &mut csv::Reader<R>,
    header: &mut StringRecord,
    table: &str,
) -> Result<bool, LoadError> {
    reader.read_record(header).map_err(|e| LoadError::Read {
        table: table.to_string(),
        message: format!("header: {e}"),
    })
}

/// Load `source` into `table` with default options and the given batch size.
pub fn load_table<S, R>(
    store: S,
    source: R,
    table: &str,
    batch_size: usize,
) -> Result<TableLoadSummary, LoadError>
where
    S: TableStore,
    R: Read,
{
    let options = LoadOptions {
        batch_size,
        ..Default::default()
    };
    Loader::new(store, options).load_table(source, table)
}
