//! The constructed catalog service: one object, injected dependencies.
//!
//! This is the surface an interactive client embeds. It owns the aggregator,
//! the stream resolver, the preloader, and the single rate limiter they
//! share; create it at startup, drop it at shutdown.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogError, CatalogItem, FeedAggregator};
use crate::config::Config;
use crate::preload::Preloader;
use crate::rate_limit::RateLimiter;
use crate::source::{HttpSourceClient, SourceClient, SourceError};
use crate::stream::{Episode, ResolveError, StreamResolver};

/// Cache and traffic counters for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    /// Items in the catalog cache.
    pub catalog_items: usize,
    /// Age of the catalog cache entry in seconds, if populated.
    pub catalog_age_secs: Option<u64>,
    /// Resolved stream URLs held.
    pub resolved_urls: usize,
    /// Resolutions currently in flight.
    pub in_flight: usize,
    /// Preload tasks not yet reaped.
    pub outstanding_preloads: usize,
}

/// Top-level entry point for catalog browsing and stream resolution.
pub struct CatalogService {
    aggregator: FeedAggregator,
    resolver: Arc<StreamResolver>,
    preloader: Preloader,
    fallback_url: String,
}

impl CatalogService {
    /// Build a service around an injected source client.
    pub fn new(client: Arc<dyn SourceClient>, config: &Config) -> Self {
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit.min_interval(),
            config.rate_limit.cooldown(),
        ));

        let aggregator = FeedAggregator::new(
            Arc::clone(&client),
            Arc::clone(&limiter),
            config.catalog.endpoints.clone(),
            config.catalog.ttl(),
        );

        let resolver = Arc::new(StreamResolver::new(client, limiter));

        let preloader = Preloader::new(
            Arc::clone(&resolver),
            config.preload.count,
            config.preload.timeout(),
        );

        Self {
            aggregator,
            resolver,
            preloader,
            fallback_url: config.stream.fallback_url.clone(),
        }
    }

    /// Build a service with the production HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = Arc::new(HttpSourceClient::new(&config.source)?);
        Ok(Self::new(client, config))
    }

    /// The merged catalog; served from cache while fresh.
    pub async fn catalog(&self) -> Result<Catalog, CatalogError> {
        self.aggregator.catalog().await
    }

    /// A randomly reordered copy of the cached catalog. This is also what
    /// backs the "load more" gesture: the feed is reshuffled, not re-fetched.
    pub async fn shuffle(&self) -> Vec<CatalogItem> {
        self.aggregator.shuffle().await
    }

    /// Case-insensitive substring search over name and description of the
    /// cached catalog. Performs the initial catalog load if none happened
    /// yet; no other network access.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let catalog = self.catalog().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(catalog.items);
        }
        Ok(catalog
            .items
            .into_iter()
            .filter(|item| item.matches(&needle))
            .collect())
    }

    /// Resolve a playable URL for an item. `Ok("")` means no usable URL.
    pub async fn resolve_url(&self, item_id: &str) -> Result<String, ResolveError> {
        self.resolver.resolve(item_id).await
    }

    /// Resolve a playable URL, substituting the configured placeholder
    /// stream when resolution fails or comes up empty. Never fails.
    pub async fn playable_url(&self, item_id: &str) -> String {
        match self.resolver.resolve(item_id).await {
            Ok(url) if !url.is_empty() => url,
            Ok(_) => {
                debug!(item_id = item_id, "No playable URL, using fallback");
                self.fallback_url.clone()
            }
            Err(e) => {
                warn!(item_id = item_id, error = %e, "Resolution failed, using fallback");
                self.fallback_url.clone()
            }
        }
    }

    /// Full episode listing for an item (detail view).
    pub async fn episodes(&self, item_id: &str) -> Result<Vec<Episode>, ResolveError> {
        self.resolver.episodes(item_id).await
    }

    /// Preload stream URLs for the items after the currently viewed
    /// position. Returns how many preloads were scheduled.
    pub async fn preload_after(&self, position: usize) -> usize {
        let items = self.aggregator.cached_items().await;
        self.preloader.preload_after(&items, position).await
    }

    /// Abort all outstanding preloads (view discarded).
    pub async fn cancel_preloads(&self) {
        self.preloader.cancel_all().await;
    }

    /// Clear the catalog cache; the next `catalog()` call refreshes.
    pub async fn invalidate(&self) {
        self.aggregator.invalidate().await;
    }

    /// Drop every resolved stream URL, allowing re-resolution.
    pub async fn clear_resolved_urls(&self) {
        self.resolver.clear().await;
    }

    /// Current cache and traffic counters.
    pub async fn stats(&self) -> ServiceStats {
        ServiceStats {
            catalog_items: self.aggregator.cached_len().await,
            catalog_age_secs: self.aggregator.cache_age().await.map(|age| age.as_secs()),
            resolved_urls: self.resolver.cached_len().await,
            in_flight: self.resolver.in_flight_len().await,
            outstanding_preloads: self.preloader.outstanding().await,
        }
    }
}
