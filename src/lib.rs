pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CleanerSettings};
pub use core::{etl::EtlEngine, pipeline::OrderCleanerPipeline, transform::transform};
pub use domain::model::{Cell, CleaningRules, OrderTable, RemovalConfig, TransformSummary};
pub use utils::error::{CleanerError, Result};
