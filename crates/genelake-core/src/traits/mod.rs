//! Trait seams between the loader and the store.

pub mod table_store;

pub use table_store::TableStore;
