//! Read-only query access for the presentation layer.

pub mod tables;

pub use tables::{count_rows, sample_rows, table_summary, SampleRow, TableCount};
