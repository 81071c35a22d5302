//! Run driver: plans the files, checks inputs, then loads table by table.
//!
//! The whole run is sequential. Missing inputs are detected before anything
//! is written and abort the run. A file-level failure (header mismatch,
//! rejected batch) is recorded and the next file proceeds, except when the
//! store itself became unavailable.

use std::path::PathBuf;

use genelake_core::config::LakeConfig;
use genelake_core::errors::{LoadError, RunError, StorageError};
use genelake_core::schema::{order_subset, Entity};
use genelake_core::traits::TableStore;
use genelake_storage::DatabaseManager;

use crate::loader::{LoadOptions, Loader};
use crate::report::{FileOutcome, FileReport, RunReport};

/// One table and the file it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLoad {
    pub entity: Entity,
    pub path: PathBuf,
}

/// The files of a run, in dependency order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadPlan {
    pub steps: Vec<PlannedLoad>,
}

impl LoadPlan {
    /// Resolve the selected tables to their files and order them.
    pub fn from_config(config: &LakeConfig) -> Self {
        let steps = order_subset(&config.loader.selected_entities())
            .into_iter()
            .map(|entity| PlannedLoad {
                entity,
                path: config.source.file_for(entity),
            })
            .collect();
        Self { steps }
    }

    /// Build a plan from explicit `(entity, path)` pairs, reordered by dependency.
    pub fn from_files<I>(files: I) -> Self
    where
        I: IntoIterator<Item = (Entity, PathBuf)>,
    {
        let mut files: Vec<(Entity, PathBuf)> = files.into_iter().collect();
        let order = order_subset(&files.iter().map(|(e, _)| *e).collect::<Vec<_>>());
        let steps = order
            .into_iter()
            .filter_map(|entity| {
                let idx = files.iter().position(|(e, _)| *e == entity)?;
                let (entity, path) = files.swap_remove(idx);
                Some(PlannedLoad { entity, path })
            })
            .collect();
        Self { steps }
    }

    pub fn tables(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.entity.table_name()).collect()
    }

    /// Fail with `FileNotFound` for the first planned file that does not exist.
    pub fn check_inputs(&self) -> Result<(), RunError> {
        match self.steps.iter().find(|step| !step.path.is_file()) {
            Some(step) => Err(RunError::FileNotFound {
                table: step.entity.table_name().to_string(),
                path: step.path.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Load everything `config` selects into the configured database.
pub fn run(config: &LakeConfig) -> Result<RunReport, RunError> {
    let plan = LoadPlan::from_config(config);
    plan.check_inputs()?;

    let db_path = config.store.effective_database_path();
    let db = DatabaseManager::open_with_pool_size(&db_path, config.store.effective_read_pool_size())?;
    tracing::info!(
        database = %db_path.display(),
        tables = ?plan.tables(),
        "starting load run"
    );

    run_plan(&db, &plan, LoadOptions::from_config(config))
}

/// Execute a plan against any store.
pub fn run_plan<S: TableStore>(
    store: S,
    plan: &LoadPlan,
    options: LoadOptions,
) -> Result<RunReport, RunError> {
    plan.check_inputs()?;

    let loader = Loader::new(store, options);
    let mut report = RunReport::default();

    for step in &plan.steps {
        let table = step.entity.table_name();
        match loader.load_file(&step.path, table) {
            Ok(summary) if summary.empty_source => report.push(FileReport {
                table: table.to_string(),
                path: step.path.clone(),
                outcome: FileOutcome::Empty,
            }),
            Ok(summary) => report.push(FileReport {
                table: table.to_string(),
                path: step.path.clone(),
                outcome: FileOutcome::Loaded(summary),
            }),
            Err(LoadError::FileNotFound { path }) => {
                return Err(RunError::FileNotFound {
                    table: table.to_string(),
                    path,
                });
            }
            Err(LoadError::Store(e @ StorageError::StoreUnavailable { .. })) => {
                tracing::error!(table, path = %step.path.display(), error = %e, "store unavailable, aborting run");
                return Err(RunError::Store(e));
            }
            Err(e) => {
                tracing::error!(table, path = %step.path.display(), error = %e, "file load failed");
                report.push(FileReport::failed(table, step.path.clone(), &e));
            }
        }
    }

    tracing::info!(
        rows_written = report.total_written(),
        rows_skipped = report.total_skipped(),
        failed_files = report.failures().count(),
        "load run complete"
    );
    Ok(report)
}
