pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::bigquery::BigQueryCatalog;
pub use adapters::storage::LocalStorage;
pub use app::pipelines::{LookmlPipeline, NamespacesPipeline};
pub use config::{LookmlConfig, NamespacesConfig};
pub use core::engine::Engine;
pub use utils::error::{GenError, Result};
