//! Header validation: a source header must be a permutation of the schema's columns.

use std::fmt;

use super::tables::TableSchema;

/// Maps each schema column (by declared position) to its position in the source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    source_positions: Vec<usize>,
    source_width: usize,
}

impl ColumnMapping {
    /// Source record position of the schema column at `schema_index`.
    pub fn source_index(&self, schema_index: usize) -> usize {
        self.source_positions[schema_index]
    }

    /// Number of fields every source record must carry.
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    /// Schema-ordered `(schema_index, source_index)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.source_positions.iter().copied().enumerate()
    }
}

/// Why a header is not a permutation of the declared columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMismatch {
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
    pub duplicated: Vec<String>,
}

impl HeaderMismatch {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.duplicated.is_empty()
    }
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing columns [{}]", self.missing.join(", ")));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected columns [{}]", self.unexpected.join(", ")));
        }
        if !self.duplicated.is_empty() {
            parts.push(format!("duplicated columns [{}]", self.duplicated.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

impl TableSchema {
    /// Validate a source header against the declared columns and build the
    /// column mapping. Names are compared exactly after trimming whitespace
    /// and a leading byte-order mark.
    pub fn map_header<'h, I>(&self, header: I) -> Result<ColumnMapping, HeaderMismatch>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let names: Vec<&str> = header
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let name = if i == 0 {
                    name.trim_start_matches('\u{feff}')
                } else {
                    name
                };
                name.trim()
            })
            .collect();

        let mut mismatch = HeaderMismatch::default();
        let mut positions: Vec<Option<usize>> = vec![None; self.columns.len()];

        for (source_index, name) in names.iter().enumerate() {
            match self.index_of(name) {
                Some(schema_index) => {
                    if positions[schema_index].is_some() {
                        if !mismatch.duplicated.iter().any(|d| d == name) {
                            mismatch.duplicated.push((*name).to_string());
                        }
                    } else {
                        positions[schema_index] = Some(source_index);
                    }
                }
                None => mismatch.unexpected.push((*name).to_string()),
            }
        }

        for (column, position) in self.columns.iter().zip(&positions) {
            if position.is_none() {
                mismatch.missing.push(column.name.to_string());
            }
        }

        if !mismatch.is_empty() {
            return Err(mismatch);
        }

        Ok(ColumnMapping {
            source_positions: positions.into_iter().flatten().collect(),
            source_width: names.len(),
        })
    }
}
