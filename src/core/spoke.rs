use crate::core::lkml;
use crate::core::lookml::ModelFile;
use crate::domain::model::NamespaceRegistry;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

const SUB_DIRS: &[&str] = &["views", "explores", "dashboards"];

/// The model file scaffolded for a freshly created namespace directory, with
/// its path relative to the target directory. Callers decide how it is
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    pub path: String,
    pub content: String,
}

/// Scaffold one directory per namespace with views/explores/dashboards
/// subdirectories, returning a model file for each namespace created. A
/// namespace directory that already exists is left entirely untouched;
/// hand-authored content is never overwritten.
pub fn generate_directories(
    registry: &NamespaceRegistry,
    base_dir: &Path,
    connection: &str,
) -> Result<Vec<ModelArtifact>> {
    let hub_name = base_dir
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("looker-hub");

    let mut models = Vec::new();
    for (name, namespace) in registry {
        let target = base_dir.join(name);
        if target.exists() {
            tracing::debug!("Namespace directory {} exists, skipping", target.display());
            continue;
        }
        for sub_dir in SUB_DIRS {
            fs::create_dir_all(target.join(sub_dir))?;
        }

        let model = ModelFile {
            connection: connection.to_string(),
            label: namespace.canonical_app_name.clone(),
            includes: vec![
                format!("//{}/{}/explores/*", hub_name, name),
                format!("//{}/{}/dashboards/*", hub_name, name),
                "views/*".to_string(),
                "explores/*".to_string(),
                "dashboards/*".to_string(),
            ],
        };
        models.push(ModelArtifact {
            path: format!("{}/{}.model.lkml", name, name),
            content: lkml::model_file(&model),
        });
    }
    Ok(models)
}
