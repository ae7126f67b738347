use crate::utils::error::{GenError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Thin wrapper over reqwest for the listings and archive downloads. Failure
/// statuses surface as errors instead of empty bodies.
#[derive(Debug, Clone, Default)]
pub struct RemoteFetcher {
    client: Client,
}

impl RemoteFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Fetching JSON from: {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GenError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching archive from: {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GenError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
