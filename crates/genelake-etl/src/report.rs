//! Run report: one entry per planned file, in load order.

use std::fmt;
use std::path::PathBuf;

use genelake_core::errors::{LakeErrorCode, LoadError, RunError};
use serde::Serialize;

use crate::loader::TableLoadSummary;

/// Exit status when at least one planned file failed.
pub const EXIT_FILE_FAILED: u8 = 1;
/// Exit status when the run could not start or was aborted.
pub const EXIT_FATAL: u8 = 2;

/// Process exit status for a run outcome: 0 when every planned file loaded
/// or was empty, `EXIT_FILE_FAILED` when any file failed, `EXIT_FATAL` for
/// config errors, missing inputs and an unavailable store.
pub fn exit_status(outcome: &Result<RunReport, RunError>) -> u8 {
    match outcome {
        Ok(report) if report.is_success() => 0,
        Ok(_) => EXIT_FILE_FAILED,
        Err(_) => EXIT_FATAL,
    }
}

/// What happened to one planned file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Loaded(TableLoadSummary),
    /// The file had no header row; nothing was created or written.
    Empty,
    /// A file-level error aborted this file; other files continued.
    Failed { code: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub table: String,
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn failed(table: &str, path: PathBuf, error: &LoadError) -> Self {
        Self {
            table: table.to_string(),
            path,
            outcome: FileOutcome::Failed {
                code: error.error_code(),
                message: error.to_string(),
            },
        }
    }

    pub fn summary(&self) -> Option<&TableLoadSummary> {
        match &self.outcome {
            FileOutcome::Loaded(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Aggregated outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn push(&mut self, report: FileReport) {
        self.files.push(report);
    }

    /// True when no planned file failed. Skipped rows and empty files do not count.
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }

    pub fn file(&self, table: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.table == table)
    }

    pub fn total_written(&self) -> usize {
        self.files
            .iter()
            .filter_map(FileReport::summary)
            .map(|s| s.rows_written)
            .sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.files
            .iter()
            .filter_map(FileReport::summary)
            .map(|s| s.rows_skipped)
            .sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            match &file.outcome {
                FileOutcome::Loaded(s) => writeln!(
                    f,
                    "{:<20} loaded   {:>10} written {:>8} skipped ({} batches)",
                    file.table, s.rows_written, s.rows_skipped, s.batches
                )?,
                FileOutcome::Empty => writeln!(
                    f,
                    "{:<20} empty    {}",
                    file.table,
                    file.path.display()
                )?,
                FileOutcome::Failed { code, message } => {
                    writeln!(f, "{:<20} FAILED   [{code}] {message}", file.table)?
                }
            }
        }
        write!(
            f,
            "total: {} rows written, {} skipped, {} files failed",
            self.total_written(),
            self.total_skipped(),
            self.failures().count()
        )
    }
}
