use crate::domain::model::{SchemaField, TableReference};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Read access to live BigQuery table schemas. Production talks to the
/// tables.get REST endpoint; tests substitute a canned catalog.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    async fn get_table(&self, reference: &TableReference) -> Result<Vec<SchemaField>>;
}

pub trait NamespacesConfigProvider: Send + Sync {
    fn app_listings_uri(&self) -> &str;
    fn generated_sql_uri(&self) -> &str;
    fn project(&self) -> &str;
    fn custom_namespaces_path(&self) -> Option<&str>;
    fn disallowlist_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
}

pub trait LookmlConfigProvider: Send + Sync {
    fn namespaces_path(&self) -> &str;
    fn target_dir(&self) -> &str;
    fn connection(&self) -> &str;
}

/// A staged generation run: gather inputs, compile, write artifacts.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Raw: Send;
    type Output: Send;

    async fn extract(&self) -> Result<Self::Raw>;
    async fn transform(&self, raw: Self::Raw) -> Result<Self::Output>;
    async fn load(&self, output: Self::Output) -> Result<String>;
}
