//! Loader configuration.

use serde::{Deserialize, Serialize};

use crate::schema::Entity;

/// Default rows per batch transaction.
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Batching and validation settings for a load run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoaderConfig {
    /// Rows buffered per batch transaction. Default: 100000.
    pub batch_size: Option<usize>,
    /// Check row-local invariants after coercion. Default: false.
    pub validate_invariants: Option<bool>,
    /// Restrict the run to these tables. Empty means all ten.
    pub tables: Vec<String>,
}

impl LoaderConfig {
    /// Returns the effective batch size, defaulting to 100000.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// Returns whether invariant checks are enabled, defaulting to false.
    pub fn effective_validate_invariants(&self) -> bool {
        self.validate_invariants.unwrap_or(false)
    }

    /// The selected entities, in declaration order. Unknown names are dropped;
    /// `LakeConfig::validate` rejects them first.
    pub fn selected_entities(&self) -> Vec<Entity> {
        if self.tables.is_empty() {
            return Entity::ALL.to_vec();
        }
        Entity::ALL
            .into_iter()
            .filter(|e| self.tables.iter().any(|t| t == e.table_name()))
            .collect()
    }
}
