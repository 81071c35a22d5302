//! Top-level genelake configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoaderConfig, SourceConfig, StoreConfig};
use crate::errors::ConfigError;
use crate::schema::Entity;

/// Name of the project config file looked up in the run root.
pub const PROJECT_CONFIG_FILE: &str = "genelake.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GENELAKE_*`)
/// 3. Project config (`genelake.toml` in the run root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LakeConfig {
    pub source: SourceConfig,
    pub store: StoreConfig,
    pub loader: LoaderConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<String>,
    pub database_path: Option<String>,
    pub batch_size: Option<usize>,
    pub validate_invariants: Option<bool>,
    pub tables: Vec<String>,
}

impl LakeConfig {
    /// Load configuration with layered resolution, then resolve relative
    /// paths against `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
            tracing::debug!(path = %project_config_path.display(), "merged project config");
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        config.rebase(root);

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &LakeConfig) -> Result<(), ConfigError> {
        if config.loader.batch_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "loader.batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(delimiter) = config.source.delimiter {
            if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' {
                return Err(ConfigError::ValidationFailed {
                    field: "source.delimiter".to_string(),
                    message: format!("{delimiter:?} is not a usable single-byte delimiter"),
                });
            }
        }
        if config.store.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "store.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for table in config.source.files.keys() {
            if Entity::from_table_name(table).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("source.files.{table}"),
                    message: "not a known table".to_string(),
                });
            }
        }
        for table in &config.loader.tables {
            if Entity::from_table_name(table).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "loader.tables".to_string(),
                    message: format!("{table} is not a known table"),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut LakeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: LakeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a value.
    fn merge(base: &mut LakeConfig, other: &LakeConfig) {
        // Source
        if other.source.data_dir.is_some() {
            base.source.data_dir = other.source.data_dir.clone();
        }
        for (table, file) in &other.source.files {
            base.source.files.insert(table.clone(), file.clone());
        }
        if other.source.delimiter.is_some() {
            base.source.delimiter = other.source.delimiter;
        }

        // Store
        if other.store.database_path.is_some() {
            base.store.database_path = other.store.database_path.clone();
        }
        if other.store.read_pool_size.is_some() {
            base.store.read_pool_size = other.store.read_pool_size;
        }

        // Loader
        if other.loader.batch_size.is_some() {
            base.loader.batch_size = other.loader.batch_size;
        }
        if other.loader.validate_invariants.is_some() {
            base.loader.validate_invariants = other.loader.validate_invariants;
        }
        if !other.loader.tables.is_empty() {
            base.loader.tables = other.loader.tables.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `GENELAKE_DATA_DIR`, `GENELAKE_BATCH_SIZE`, etc.
    fn apply_env_overrides(config: &mut LakeConfig) {
        if let Ok(val) = std::env::var("GENELAKE_DATA_DIR") {
            config.source.data_dir = Some(val);
        }
        if let Ok(val) = std::env::var("GENELAKE_DATABASE") {
            config.store.database_path = Some(val);
        }
        if let Ok(val) = std::env::var("GENELAKE_BATCH_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.loader.batch_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GENELAKE_VALIDATE") {
            if let Ok(v) = val.parse::<bool>() {
                config.loader.validate_invariants = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut LakeConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.data_dir {
            config.source.data_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.database_path {
            config.store.database_path = Some(v.clone());
        }
        if let Some(v) = cli.batch_size {
            config.loader.batch_size = Some(v);
        }
        if let Some(v) = cli.validate_invariants {
            config.loader.validate_invariants = Some(v);
        }
        if !cli.tables.is_empty() {
            config.loader.tables = cli.tables.clone();
        }
    }

    /// Resolve relative data and database paths against `root`.
    fn rebase(&mut self, root: &Path) {
        let data_dir = root.join(self.source.effective_data_dir());
        self.source.data_dir = Some(path_string(data_dir));
        let database = root.join(self.store.effective_database_path());
        self.store.database_path = Some(path_string(database));
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
