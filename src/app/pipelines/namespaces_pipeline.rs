use crate::adapters::http::RemoteFetcher;
use crate::core::namespaces::{merge_registry, Disallowlist};
use crate::domain::model::{AppListing, CustomNamespace, NamespaceRegistry, TableCatalog};
use crate::domain::ports::{NamespacesConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::fs;

/// Inputs gathered for a registry build: remote discovery plus local
/// hand-authored declarations.
pub struct NamespacesInput {
    pub listings: Vec<AppListing>,
    pub catalog: TableCatalog,
    pub custom: BTreeMap<String, CustomNamespace>,
    pub disallowlist: Disallowlist,
}

pub struct NamespacesPipeline<S: Storage, C: NamespacesConfigProvider> {
    storage: S,
    config: C,
    fetcher: RemoteFetcher,
}

impl<S: Storage, C: NamespacesConfigProvider> NamespacesPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            fetcher: RemoteFetcher::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: NamespacesConfigProvider> Pipeline for NamespacesPipeline<S, C> {
    type Raw = NamespacesInput;
    type Output = NamespaceRegistry;

    async fn extract(&self) -> Result<NamespacesInput> {
        let listings: Vec<AppListing> = self
            .fetcher
            .fetch_json(self.config.app_listings_uri())
            .await?;
        tracing::debug!("Fetched {} app listings", listings.len());

        let archive = self
            .fetcher
            .fetch_bytes(self.config.generated_sql_uri())
            .await?;
        let catalog = TableCatalog::from_zip(&archive)?;
        tracing::debug!("Archive lists {} tables", catalog.all_tables().len());

        let custom = match self.config.custom_namespaces_path() {
            Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
            None => BTreeMap::new(),
        };

        let disallowlist = match self.config.disallowlist_path() {
            Some(path) => Disallowlist::parse(&fs::read_to_string(path)?)?,
            None => Disallowlist::empty(),
        };

        Ok(NamespacesInput {
            listings,
            catalog,
            custom,
            disallowlist,
        })
    }

    async fn transform(&self, input: NamespacesInput) -> Result<NamespaceRegistry> {
        let registry = merge_registry(
            &input.listings,
            self.config.project(),
            &input.catalog,
            &input.custom,
            &input.disallowlist,
        )?;
        tracing::info!("Registry holds {} namespaces", registry.len());
        Ok(registry)
    }

    async fn load(&self, registry: NamespaceRegistry) -> Result<String> {
        let yaml = serde_yaml::to_string(&registry)?;
        self.storage
            .write_file(self.config.output_path(), yaml.as_bytes())
            .await?;
        Ok(self.config.output_path().to_string())
    }
}
