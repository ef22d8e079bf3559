//! Mock source client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};

use crate::source::{RawCatalogRecord, RawEpisodeRecord, SourceClient, SourceError};

/// Mock implementation of the `SourceClient` trait.
///
/// Provides controllable behavior for testing:
/// - Per-endpoint catalog records and errors
/// - Per-item episode records and errors
/// - Simulated network latency
/// - Recorded calls for assertions
///
/// # Example
///
/// ```rust,ignore
/// use dramafeed_core::testing::{fixtures, MockSourceClient};
///
/// let client = MockSourceClient::new();
/// client.set_endpoint_records("foryou", vec![
///     fixtures::catalog_record("1", "Love Storm", "cover.jpg"),
/// ]).await;
/// client.set_latency(Duration::from_millis(200)).await;
///
/// // ... drive the aggregator/resolver, then:
/// assert_eq!(client.endpoint_call_count().await, 1);
/// ```
pub struct MockSourceClient {
    /// Records returned per endpoint; unknown endpoints return an empty list.
    endpoint_records: Arc<RwLock<HashMap<String, Vec<RawCatalogRecord>>>>,
    /// Endpoints configured to fail.
    endpoint_errors: Arc<RwLock<HashMap<String, SourceError>>>,
    /// Episode listings per item id; unknown ids return an empty list.
    episodes: Arc<RwLock<HashMap<String, Vec<RawEpisodeRecord>>>>,
    /// Item ids whose episode fetch is configured to fail.
    episode_errors: Arc<RwLock<HashMap<String, SourceError>>>,
    /// Simulated network latency applied to every call.
    latency: Arc<RwLock<Duration>>,
    /// Recorded endpoint fetches.
    endpoint_calls: Arc<RwLock<Vec<String>>>,
    /// Recorded episode fetches.
    episode_calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockSourceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSourceClient {
    /// Create a mock with no configured records and zero latency.
    pub fn new() -> Self {
        Self {
            endpoint_records: Arc::new(RwLock::new(HashMap::new())),
            endpoint_errors: Arc::new(RwLock::new(HashMap::new())),
            episodes: Arc::new(RwLock::new(HashMap::new())),
            episode_errors: Arc::new(RwLock::new(HashMap::new())),
            latency: Arc::new(RwLock::new(Duration::ZERO)),
            endpoint_calls: Arc::new(RwLock::new(Vec::new())),
            episode_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the records one endpoint returns.
    pub async fn set_endpoint_records(&self, endpoint: &str, records: Vec<RawCatalogRecord>) {
        self.endpoint_records
            .write()
            .await
            .insert(endpoint.to_string(), records);
    }

    /// Configure one endpoint to fail with the given error.
    pub async fn set_endpoint_error(&self, endpoint: &str, error: SourceError) {
        self.endpoint_errors
            .write()
            .await
            .insert(endpoint.to_string(), error);
    }

    /// Clear all endpoint errors.
    pub async fn clear_endpoint_errors(&self) {
        self.endpoint_errors.write().await.clear();
    }

    /// Set the episode listing for one item.
    pub async fn set_episodes(&self, item_id: &str, episodes: Vec<RawEpisodeRecord>) {
        self.episodes
            .write()
            .await
            .insert(item_id.to_string(), episodes);
    }

    /// Configure episode fetches for one item to fail.
    pub async fn set_episode_error(&self, item_id: &str, error: SourceError) {
        self.episode_errors
            .write()
            .await
            .insert(item_id.to_string(), error);
    }

    /// Clear all episode errors.
    pub async fn clear_episode_errors(&self) {
        self.episode_errors.write().await.clear();
    }

    /// Simulated latency applied to every call.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    /// Total endpoint fetches performed.
    pub async fn endpoint_call_count(&self) -> usize {
        self.endpoint_calls.read().await.len()
    }

    /// Recorded endpoint fetches, in call order.
    pub async fn endpoint_calls(&self) -> Vec<String> {
        self.endpoint_calls.read().await.clone()
    }

    /// Total episode fetches performed.
    pub async fn episode_call_count(&self) -> usize {
        self.episode_calls.read().await.len()
    }

    /// Episode fetches recorded for one item id.
    pub async fn episode_calls_for(&self, item_id: &str) -> usize {
        self.episode_calls
            .read()
            .await
            .iter()
            .filter(|id| id.as_str() == item_id)
            .count()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().await;
        if latency > Duration::ZERO {
            sleep(latency).await;
        }
    }
}

#[async_trait]
impl SourceClient for MockSourceClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<Vec<RawCatalogRecord>, SourceError> {
        self.endpoint_calls.write().await.push(endpoint.to_string());
        self.simulate_latency().await;

        if let Some(error) = self.endpoint_errors.read().await.get(endpoint) {
            return Err(error.clone());
        }

        Ok(self
            .endpoint_records
            .read()
            .await
            .get(endpoint)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_episodes(
        &self,
        item_id: &str,
    ) -> Result<Vec<RawEpisodeRecord>, SourceError> {
        self.episode_calls.write().await.push(item_id.to_string());
        self.simulate_latency().await;

        if let Some(error) = self.episode_errors.read().await.get(item_id) {
            return Err(error.clone());
        }

        Ok(self
            .episodes
            .read()
            .await
            .get(item_id)
            .cloned()
            .unwrap_or_default())
    }
}
