//! Multi-endpoint catalog aggregation behind a TTL cache.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::rate_limit::RateLimiter;
use crate::source::{SourceClient, SourceError};

use super::merge::merge_records;
use super::types::{Catalog, CatalogError, CatalogItem};

/// The single whole-cache entry.
struct CacheEntry {
    items: Vec<CatalogItem>,
    populated_at: Instant,
    fetched_at: DateTime<Utc>,
}

/// Fetches and merges the configured feed endpoints, caching the result.
///
/// The entire check-or-refresh sequence runs under one lock: concurrent
/// callers never trigger duplicate refreshes, and a caller arriving during a
/// refresh blocks until it completes, then observes the fresh entry. This is
/// the one deliberately long critical section in the crate.
pub struct FeedAggregator {
    client: Arc<dyn SourceClient>,
    limiter: Arc<RateLimiter>,
    endpoints: Vec<String>,
    ttl: Duration,
    cache: Mutex<Option<CacheEntry>>,
}

impl FeedAggregator {
    pub fn new(
        client: Arc<dyn SourceClient>,
        limiter: Arc<RateLimiter>,
        endpoints: Vec<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            limiter,
            endpoints,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Return the merged catalog, refreshing it if the cache entry is missing
    /// or older than the TTL.
    pub async fn catalog(&self) -> Result<Catalog, CatalogError> {
        let start = Instant::now();
        let mut slot = self.cache.lock().await;

        if let Some(entry) = slot.as_ref() {
            if entry.populated_at.elapsed() < self.ttl {
                debug!(items = entry.items.len(), "Catalog cache hit");
                return Ok(Catalog {
                    items: entry.items.clone(),
                    fetched_at: entry.fetched_at,
                    from_cache: true,
                    duration_ms: start.elapsed().as_millis() as u64,
                    endpoint_errors: HashMap::new(),
                });
            }
        }

        debug!(endpoints = ?self.endpoints, "Refreshing catalog");

        let fetches = self.endpoints.iter().map(|endpoint| {
            let endpoint = endpoint.clone();
            async move {
                self.limiter.acquire().await;
                let result = self.client.fetch_endpoint(&endpoint).await;
                (endpoint, result)
            }
        });
        let results = futures::future::join_all(fetches).await;

        let mut batches: Vec<(String, Vec<_>)> = Vec::new();
        let mut endpoint_errors: HashMap<String, String> = HashMap::new();

        for (endpoint, result) in results {
            match result {
                Ok(records) => batches.push((endpoint, records)),
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Endpoint fetch failed");
                    if matches!(e, SourceError::RateLimited) {
                        self.limiter.penalize().await;
                    }
                    endpoint_errors.insert(endpoint, e.to_string());
                }
            }
        }

        let outcome = merge_records(batches);

        // Partial failure is fine; only a refresh that produced nothing while
        // at least one endpoint errored is surfaced. The stale entry (if any)
        // is left in place so the next call retries.
        if outcome.items.is_empty() && !endpoint_errors.is_empty() {
            return Err(CatalogError::AllEndpointsFailed(endpoint_errors));
        }

        let fetched_at = Utc::now();
        *slot = Some(CacheEntry {
            items: outcome.items.clone(),
            populated_at: Instant::now(),
            fetched_at,
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            items = outcome.items.len(),
            duplicates_dropped = outcome.duplicates_dropped,
            invalid_dropped = outcome.invalid_dropped,
            duration_ms = duration_ms,
            "Catalog refresh complete"
        );

        Ok(Catalog {
            items: outcome.items,
            fetched_at,
            from_cache: false,
            duration_ms,
            endpoint_errors,
        })
    }

    /// A randomly reordered copy of the cached list.
    ///
    /// Never fetches and never mutates the canonical cached order; returns an
    /// empty list when nothing is cached.
    pub async fn shuffle(&self) -> Vec<CatalogItem> {
        let slot = self.cache.lock().await;
        let mut items = match slot.as_ref() {
            Some(entry) => entry.items.clone(),
            None => return Vec::new(),
        };
        drop(slot);

        items.shuffle(&mut rand::rng());
        items
    }

    /// Clear the cache entry unconditionally; the next `catalog()` call
    /// performs a full refresh.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
        debug!("Catalog cache invalidated");
    }

    /// The currently cached items, expired or not; empty when nothing is
    /// cached. Never fetches.
    pub async fn cached_items(&self) -> Vec<CatalogItem> {
        self.cache
            .lock()
            .await
            .as_ref()
            .map(|entry| entry.items.clone())
            .unwrap_or_default()
    }

    /// Number of cached items.
    pub async fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .await
            .as_ref()
            .map(|entry| entry.items.len())
            .unwrap_or(0)
    }

    /// Age of the cache entry, if one exists.
    pub async fn cache_age(&self) -> Option<Duration> {
        self.cache
            .lock()
            .await
            .as_ref()
            .map(|entry| entry.populated_at.elapsed())
    }
}
