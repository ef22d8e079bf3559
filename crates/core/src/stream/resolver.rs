//! Stream URL cache with in-flight request deduplication.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::rate_limit::RateLimiter;
use crate::source::{SourceClient, SourceError};

use super::types::{Episode, ResolveError};

type SharedResolution = Shared<BoxFuture<'static, Result<String, ResolveError>>>;

/// Resolves item ids to playable URLs, caching non-empty results for the
/// process lifetime and sharing in-flight resolutions between concurrent
/// callers.
///
/// Locks are held only for the check/assign decision, never across a network
/// call: the in-flight map lock spans exactly the check-and-insert, which is
/// what guarantees at most one resolution per id.
pub struct StreamResolver {
    client: Arc<dyn SourceClient>,
    limiter: Arc<RateLimiter>,
    urls: Arc<Mutex<HashMap<String, String>>>,
    in_flight: Arc<Mutex<HashMap<String, SharedResolution>>>,
}

impl StreamResolver {
    pub fn new(client: Arc<dyn SourceClient>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            client,
            limiter,
            urls: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolve an item id to a playable URL.
    ///
    /// `Ok("")` means the upstream had no usable URL; empty results are not
    /// cached, so a later call retries. Concurrent callers for the same id
    /// all observe the outcome of one shared network call.
    pub async fn resolve(&self, item_id: &str) -> Result<String, ResolveError> {
        if let Some(url) = self.urls.lock().await.get(item_id).cloned() {
            return Ok(url);
        }

        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            // A resolution may have completed between the cache check above
            // and taking the in-flight lock; look again before starting one.
            if let Some(url) = self.urls.lock().await.get(item_id).cloned() {
                return Ok(url);
            }
            match in_flight.get(item_id) {
                Some(existing) => {
                    debug!(item_id = item_id, "Joining in-flight resolution");
                    existing.clone()
                }
                None => {
                    let shared = self.spawn_resolution(item_id.to_string());
                    in_flight.insert(item_id.to_string(), shared.clone());
                    shared
                }
            }
        };

        shared.await
    }

    /// Fetch the full episode listing for an item (detail view). Rate
    /// limited like every other outbound call; not cached.
    pub async fn episodes(&self, item_id: &str) -> Result<Vec<Episode>, ResolveError> {
        self.limiter.acquire().await;

        match self.client.fetch_episodes(item_id).await {
            Ok(records) => Ok(records.into_iter().map(Episode::from_record).collect()),
            Err(SourceError::RateLimited) => {
                self.limiter.penalize().await;
                Err(ResolveError::RateLimited)
            }
            Err(e) => Err(ResolveError::Source(e.to_string())),
        }
    }

    /// The cached URL for an item, if resolution already succeeded.
    pub async fn cached(&self, item_id: &str) -> Option<String> {
        self.urls.lock().await.get(item_id).cloned()
    }

    /// Whether a resolution for this id is currently in flight.
    pub async fn pending(&self, item_id: &str) -> bool {
        self.in_flight.lock().await.contains_key(item_id)
    }

    /// Number of cached URLs.
    pub async fn cached_len(&self) -> usize {
        self.urls.lock().await.len()
    }

    /// Number of in-flight resolutions.
    pub async fn in_flight_len(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Drop every cached URL. The only path to re-resolution of a previously
    /// resolved id.
    pub async fn clear(&self) {
        self.urls.lock().await.clear();
        debug!("Stream URL cache cleared");
    }

    fn spawn_resolution(&self, item_id: String) -> SharedResolution {
        let client = Arc::clone(&self.client);
        let limiter = Arc::clone(&self.limiter);
        let urls = Arc::clone(&self.urls);
        let in_flight = Arc::clone(&self.in_flight);

        // The work runs on its own task so it completes even if every waiter
        // is dropped; a shared in-flight result is never orphaned, and cache
        // writes happen here, not in any cancelable waiter.
        let handle = tokio::spawn(async move {
            let result = fetch_best_url(client.as_ref(), &limiter, &item_id).await;

            match &result {
                Ok(url) if !url.is_empty() => {
                    urls.lock().await.insert(item_id.clone(), url.clone());
                    debug!(item_id = %item_id, "Stream URL cached");
                }
                Ok(_) => debug!(item_id = %item_id, "No playable URL, left uncached"),
                Err(e) => warn!(item_id = %item_id, error = %e, "Stream resolution failed"),
            }

            in_flight.lock().await.remove(&item_id);
            result
        });

        async move {
            match handle.await {
                Ok(result) => result,
                Err(_) => Err(ResolveError::TaskFailed),
            }
        }
        .boxed()
        .shared()
    }
}

/// One rate-limited network round trip: episode listing, then best-URL
/// selection over the first episode.
async fn fetch_best_url(
    client: &dyn SourceClient,
    limiter: &RateLimiter,
    item_id: &str,
) -> Result<String, ResolveError> {
    limiter.acquire().await;

    let records = match client.fetch_episodes(item_id).await {
        Ok(records) => records,
        Err(SourceError::RateLimited) => {
            limiter.penalize().await;
            return Err(ResolveError::RateLimited);
        }
        Err(e) => return Err(ResolveError::Source(e.to_string())),
    };

    let url = records
        .into_iter()
        .next()
        .map(Episode::from_record)
        .and_then(|episode| episode.best_url().map(str::to_owned))
        .unwrap_or_default();

    Ok(url)
}
