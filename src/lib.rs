pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::{
    etl::{EtlEngine, RunSummary},
    pipeline::TranslationPipeline,
};
pub use domain::model::{SourceRow, TranslationRecord};
pub use utils::error::{EtlError, Result};
