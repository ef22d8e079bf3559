//! HTTP implementation of the remote source client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::SourceConfig;

use super::types::{RawCatalogRecord, RawEpisodeRecord, SourceClient, SourceError};

/// Client for the upstream drama API.
pub struct HttpSourceClient {
    client: Client,
    base_url: String,
}

impl HttpSourceClient {
    /// Create a new client from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else if e.is_connect() {
                    SourceError::ConnectionFailed(e.to_string())
                } else {
                    SourceError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == 429 {
            return Err(SourceError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    fn name(&self) -> &str {
        "dramabox"
    }

    async fn fetch_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<Vec<RawCatalogRecord>, SourceError> {
        debug!(endpoint = endpoint, "Fetching catalog endpoint");
        self.get_json(&format!("dramabox/{}", endpoint), &[]).await
    }

    async fn fetch_episodes(
        &self,
        item_id: &str,
    ) -> Result<Vec<RawEpisodeRecord>, SourceError> {
        debug!(item_id = item_id, "Fetching episode listing");
        self.get_json("dramabox/allepisode", &[("bookId", item_id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = SourceConfig {
            base_url: "http://localhost:9090/api/".to_string(),
            timeout_secs: 30,
        };
        let client = HttpSourceClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9090/api");
    }

    #[test]
    fn test_client_name() {
        let client = HttpSourceClient::new(&SourceConfig::default()).unwrap();
        assert_eq!(client.name(), "dramabox");
    }
}
