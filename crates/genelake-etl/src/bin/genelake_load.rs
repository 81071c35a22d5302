//! genelake-load: load a CSV data lake snapshot into the SQLite store.

use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use genelake_core::config::{CliOverrides, LakeConfig};
use genelake_core::errors::{LakeErrorCode, RunError};
use genelake_core::tracing::init_tracing;
use genelake_etl::{exit_status, FileOutcome, EXIT_FATAL};

#[derive(FromArgs)]
/// Load the genetic data lake CSV files into the relational store.
struct Args {
    /// run root holding genelake.toml; relative paths resolve against it (default: .)
    #[argh(option, default = "PathBuf::from(\".\")")]
    root: PathBuf,

    /// directory holding the input CSV files
    #[argh(option)]
    data_dir: Option<String>,

    /// SQLite database file to load into
    #[argh(option)]
    database: Option<String>,

    /// rows per batch transaction
    #[argh(option)]
    batch_size: Option<usize>,

    /// load only this table (repeatable)
    #[argh(option)]
    only: Vec<String>,

    /// also check row-local invariants and skip violating rows
    #[argh(switch)]
    validate: bool,

    /// print the run report as JSON
    #[argh(switch)]
    json: bool,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    init_tracing();

    let overrides = CliOverrides {
        data_dir: args.data_dir,
        database_path: args.database,
        batch_size: args.batch_size,
        validate_invariants: args.validate.then_some(true),
        tables: args.only,
    };

    let outcome = LakeConfig::load(&args.root, Some(&overrides))
        .map_err(RunError::from)
        .and_then(|config| genelake_etl::run(&config));
    let status = exit_status(&outcome);

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e.report_string());
            return ExitCode::from(status);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize report: {e}");
                return ExitCode::from(EXIT_FATAL);
            }
        }
    } else {
        println!("{report}");
    }

    for failure in report.failures() {
        if let FileOutcome::Failed { code, message } = &failure.outcome {
            eprintln!("[{code}] {}: {message}", failure.path.display());
        }
    }
    ExitCode::from(status)
}
