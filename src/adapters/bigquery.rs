use crate::domain::model::{SchemaField, TableReference};
use crate::domain::ports::SchemaCatalog;
use crate::utils::error::{GenError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Live table schemas via the BigQuery tables.get REST endpoint.
pub struct BigQueryCatalog {
    client: Client,
    api_base: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableGetResponse {
    #[serde(default)]
    schema: Option<TableSchema>,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    #[serde(default)]
    fields: Vec<SchemaField>,
}

impl BigQueryCatalog {
    pub fn new(api_base: String, access_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_base,
            access_token,
        }
    }
}

#[async_trait]
impl SchemaCatalog for BigQueryCatalog {
    async fn get_table(&self, reference: &TableReference) -> Result<Vec<SchemaField>> {
        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}",
            self.api_base, reference.project, reference.dataset, reference.table
        );
        tracing::debug!("Fetching schema for: {}", reference);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(GenError::HttpStatusError {
                url,
                status: response.status().as_u16(),
            });
        }

        let table: TableGetResponse = response.json().await?;
        Ok(table.schema.map(|schema| schema.fields).unwrap_or_default())
    }
}
