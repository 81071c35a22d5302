//! Configuration system for genelake.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod lake_config;
pub mod loader_config;
pub mod source_config;
pub mod store_config;

pub use lake_config::{CliOverrides, LakeConfig};
pub use loader_config::LoaderConfig;
pub use source_config::SourceConfig;
pub use store_config::StoreConfig;
