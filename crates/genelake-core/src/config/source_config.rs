//! Input file configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::schema::Entity;

/// Where the CSV snapshot lives and how it is laid out.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding the input files. Default: `data_lake`.
    pub data_dir: Option<String>,
    /// Per-table file name overrides, relative to `data_dir`
    /// (e.g. `genotypes = "snps.csv"`). Default: `<table>.csv`.
    pub files: BTreeMap<String, String>,
    /// Field delimiter. Default: `,`.
    pub delimiter: Option<char>,
}

impl SourceConfig {
    /// Returns the effective data directory, defaulting to `data_lake`.
    pub fn effective_data_dir(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("data_lake"))
    }

    /// Returns the effective delimiter byte, defaulting to a comma.
    pub fn effective_delimiter(&self) -> u8 {
        self.delimiter
            .filter(char::is_ascii)
            .map_or(b',', |c| c as u8)
    }

    /// Path of the input file for `entity`.
    pub fn file_for(&self, entity: Entity) -> PathBuf {
        let table = entity.table_name();
        let file_name = self
            .files
            .get(table)
            .cloned()
            .unwrap_or_else(|| format!("{table}.csv"));
        self.effective_data_dir().join(file_name)
    }
}
