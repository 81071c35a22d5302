//! CSV-to-SQLite batch loader for the genetic data lake.
//!
//! `loader` ingests one delimited source into one table in bounded batches.
//! `driver` sequences the ten tables in dependency order and aggregates the
//! per-file outcomes into a `RunReport`.

pub mod driver;
pub mod loader;
pub mod report;

pub use driver::{run, run_plan, LoadPlan, PlannedLoad};
pub use loader::{load_table, LoadOptions, Loader, TableLoadSummary};
pub use report::{exit_status, FileOutcome, FileReport, RunReport, EXIT_FATAL, EXIT_FILE_FAILED};
