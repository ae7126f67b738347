pub mod lookml_pipeline;
pub mod namespaces_pipeline;

pub use lookml_pipeline::LookmlPipeline;
pub use namespaces_pipeline::NamespacesPipeline;
