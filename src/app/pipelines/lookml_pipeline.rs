use crate::core::explores::explore_entry;
use crate::core::lkml;
use crate::core::lookml::{view_from_definition, ExploreFile};
use crate::core::spoke;
use crate::domain::model::{NamespaceRegistry, SchemaField, TableReference};
use crate::domain::ports::{LookmlConfigProvider, Pipeline, SchemaCatalog, Storage};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct LookmlInput {
    pub registry: NamespaceRegistry,
    /// Schemas keyed by fully qualified table id, one per view's first table.
    pub schemas: HashMap<String, Vec<SchemaField>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the target directory.
    pub path: String,
    pub content: String,
}

pub struct GeneratedTree {
    pub registry: NamespaceRegistry,
    pub files: Vec<GeneratedFile>,
}

pub struct LookmlPipeline<S: Storage, C: LookmlConfigProvider, Cat: SchemaCatalog> {
    storage: S,
    config: C,
    catalog: Cat,
}

impl<S: Storage, C: LookmlConfigProvider, Cat: SchemaCatalog> LookmlPipeline<S, C, Cat> {
    pub fn new(storage: S, config: C, catalog: Cat) -> Self {
        Self {
            storage,
            config,
            catalog,
        }
    }

    fn hub_name(&self) -> &str {
        Path::new(self.config.target_dir())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("looker-hub")
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: LookmlConfigProvider, Cat: SchemaCatalog> Pipeline
    for LookmlPipeline<S, C, Cat>
{
    type Raw = LookmlInput;
    type Output = GeneratedTree;

    async fn extract(&self) -> Result<LookmlInput> {
        let registry: NamespaceRegistry =
            serde_yaml::from_str(&fs::read_to_string(self.config.namespaces_path())?)?;

        let mut schemas = HashMap::new();
        for namespace in registry.values() {
            for view in namespace.views.values() {
                let Some(first) = view.tables.first() else {
                    continue;
                };
                if schemas.contains_key(&first.table) {
                    continue;
                }
                let reference: TableReference = first.table.parse()?;
                let schema = self.catalog.get_table(&reference).await?;
                schemas.insert(first.table.clone(), schema);
            }
        }

        Ok(LookmlInput { registry, schemas })
    }

    async fn transform(&self, input: LookmlInput) -> Result<GeneratedTree> {
        let empty: Vec<SchemaField> = Vec::new();
        let mut files = Vec::new();

        for (name, namespace) in &input.registry {
            for (view_name, definition) in &namespace.views {
                let schema = definition
                    .tables
                    .first()
                    .and_then(|t| input.schemas.get(&t.table))
                    .unwrap_or(&empty);
                let view = view_from_definition(view_name, definition, schema)?;
                files.push(GeneratedFile {
                    path: format!("{}/views/{}.view.lkml", name, view_name),
                    content: lkml::view_file(&view),
                });
            }

            for (explore_name, definition) in &namespace.explores {
                let explore = ExploreFile {
                    include: format!("/{}/{}/views/*.view.lkml", self.hub_name(), name),
                    explores: vec![explore_entry(explore_name, definition)],
                };
                files.push(GeneratedFile {
                    path: format!("{}/explores/{}.explore.lkml", name, explore_name),
                    content: lkml::explore_file(&explore),
                });
            }
        }

        tracing::info!("Compiled {} LookML files", files.len());
        Ok(GeneratedTree {
            registry: input.registry,
            files,
        })
    }

    async fn load(&self, tree: GeneratedTree) -> Result<String> {
        let models = spoke::generate_directories(
            &tree.registry,
            Path::new(self.config.target_dir()),
            self.config.connection(),
        )?;
        for model in &models {
            self.storage
                .write_file(&model.path, model.content.as_bytes())
                .await?;
        }

        for file in &tree.files {
            self.storage
                .write_file(&file.path, file.content.as_bytes())
                .await?;
        }
        Ok(self.config.target_dir().to_string())
    }
}
