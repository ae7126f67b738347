use crate::utils::error::{GenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// One Looker namespace: a functional grouping of BigQuery datasets mapped to
/// a single model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub canonical_app_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub views: BTreeMap<String, ViewDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub explores: BTreeMap<String, ExploreDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    #[serde(rename = "type")]
    pub view_type: String,
    pub tables: Vec<ChannelTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTable {
    pub channel: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreDefinition {
    #[serde(rename = "type")]
    pub explore_type: String,
    pub views: BTreeMap<String, String>,
}

/// The unified registry written to and read from namespaces.yaml.
pub type NamespaceRegistry = BTreeMap<String, Namespace>;

/// A custom namespace declaration. Same shape as `Namespace` except the
/// canonical name is optional and table references may contain `*` wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomNamespace {
    #[serde(default)]
    pub canonical_app_name: Option<String>,
    #[serde(default)]
    pub views: BTreeMap<String, ViewDefinition>,
    #[serde(default)]
    pub explores: BTreeMap<String, ExploreDefinition>,
}

/// One entry of the app-listings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppListing {
    pub app_name: String,
    #[serde(default = "default_channel")]
    pub app_channel: String,
    pub canonical_app_name: String,
    pub bq_dataset_family: String,
    #[serde(default)]
    pub deprecated: bool,
}

fn default_channel() -> String {
    "release".to_string()
}

/// A fully qualified BigQuery table reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableReference {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl FromStr for TableReference {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [project, dataset, table]
                if !project.is_empty() && !dataset.is_empty() && !table.is_empty() =>
            {
                Ok(TableReference {
                    project: project.to_string(),
                    dataset: dataset.to_string(),
                    table: table.to_string(),
                })
            }
            _ => Err(GenError::InvalidTableReference {
                reference: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

/// BigQuery column types as returned by the tables.get REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[serde(alias = "INT64")]
    Integer,
    #[serde(alias = "FLOAT64")]
    Float,
    #[serde(alias = "BOOL")]
    Boolean,
    String,
    Bytes,
    Numeric,
    Bignumeric,
    Timestamp,
    Datetime,
    Date,
    Time,
    #[serde(alias = "STRUCT")]
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SchemaField>,
}

impl SchemaField {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            fields: Vec::new(),
        }
    }

    pub fn record(name: &str, fields: Vec<SchemaField>) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType::Record,
            fields,
        }
    }
}

/// Table listings recovered from the generated-SQL archive: project ->
/// dataset -> table names. Only entry paths of the form
/// `sql/<project>/<dataset>/<table>/...` are consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCatalog {
    projects: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_zip(data: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut catalog = Self::new();
        for i in 0..archive.len() {
            let name = archive.by_index(i).map(|f| f.name().to_string())?;
            catalog.insert_entry_path(&name);
        }
        Ok(catalog)
    }

    fn insert_entry_path(&mut self, path: &str) {
        let mut parts = path.split('/');
        if parts.next() != Some("sql") {
            return;
        }
        if let (Some(project), Some(dataset), Some(table)) =
            (parts.next(), parts.next(), parts.next())
        {
            if project.is_empty() || dataset.is_empty() || table.is_empty() {
                return;
            }
            self.insert(&TableReference {
                project: project.to_string(),
                dataset: dataset.to_string(),
                table: table.to_string(),
            });
        }
    }

    pub fn insert(&mut self, reference: &TableReference) {
        self.projects
            .entry(reference.project.clone())
            .or_default()
            .entry(reference.dataset.clone())
            .or_default()
            .insert(reference.table.clone());
    }

    pub fn tables_in(&self, project: &str, dataset: &str) -> BTreeSet<String> {
        self.projects
            .get(project)
            .and_then(|datasets| datasets.get(dataset))
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, reference: &TableReference) -> bool {
        self.projects
            .get(&reference.project)
            .and_then(|datasets| datasets.get(&reference.dataset))
            .map(|tables| tables.contains(&reference.table))
            .unwrap_or(false)
    }

    /// All fully qualified table identifiers, sorted.
    pub fn all_tables(&self) -> Vec<String> {
        self.projects
            .iter()
            .flat_map(|(project, datasets)| {
                datasets.iter().flat_map(move |(dataset, tables)| {
                    tables
                        .iter()
                        .map(move |table| format!("{}.{}.{}", project, dataset, table))
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
