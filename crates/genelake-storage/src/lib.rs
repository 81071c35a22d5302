//! SQLite store for the genetic data lake.
//!
//! One write connection held for the lifetime of a load run, a small pool of
//! read-only connections for query access, and a `TableStore` implementation
//! that writes every batch in its own transaction.

pub mod connection;
pub mod convert;
pub mod ddl;
pub mod queries;
pub mod store;

pub use connection::DatabaseManager;
