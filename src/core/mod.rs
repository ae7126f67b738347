pub mod engine;
pub mod explores;
pub mod lkml;
pub mod lookml;
pub mod namespaces;
pub mod spoke;
pub mod views;

pub use crate::domain::model::{Namespace, NamespaceRegistry, SchemaField, TableReference};
pub use crate::domain::ports::{Pipeline, SchemaCatalog, Storage};
pub use crate::utils::error::Result;
