//! Opportunistic stream URL preloading for upcoming list positions.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::catalog::CatalogItem;
use crate::stream::StreamResolver;

/// Resolves stream URLs for the next few items after the currently viewed
/// position, so scrolling forward finds them already cached.
///
/// Preloads are best-effort: timeouts and failures are logged and nothing
/// surfaces to the caller. Tasks are cancelable in bulk when the originating
/// view goes away; because cache writes live inside the shared resolution
/// task (see `StreamResolver`), an aborted preload can never write a partial
/// result.
pub struct Preloader {
    resolver: Arc<StreamResolver>,
    count: usize,
    timeout: Duration,
    tasks: Mutex<JoinSet<()>>,
}

impl Preloader {
    pub fn new(resolver: Arc<StreamResolver>, count: usize, timeout: Duration) -> Self {
        Self {
            resolver,
            count,
            timeout,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Schedule resolution for the next `count` items after `position`.
    ///
    /// Items already cached or in flight are skipped. Returns how many tasks
    /// were scheduled.
    pub async fn preload_after(&self, items: &[CatalogItem], position: usize) -> usize {
        let mut tasks = self.tasks.lock().await;
        // Reap whatever finished since the last call
        while tasks.try_join_next().is_some() {}

        let mut scheduled = 0;
        for item in items.iter().skip(position + 1).take(self.count) {
            if self.resolver.cached(&item.id).await.is_some()
                || self.resolver.pending(&item.id).await
            {
                continue;
            }

            let resolver = Arc::clone(&self.resolver);
            let item_id = item.id.clone();
            let per_item_timeout = self.timeout;

            tasks.spawn(async move {
                match timeout(per_item_timeout, resolver.resolve(&item_id)).await {
                    Ok(Ok(url)) if !url.is_empty() => {
                        debug!(item_id = %item_id, "Preloaded stream URL")
                    }
                    Ok(Ok(_)) => debug!(item_id = %item_id, "Preload found no playable URL"),
                    Ok(Err(e)) => warn!(item_id = %item_id, error = %e, "Preload failed"),
                    Err(_) => warn!(item_id = %item_id, "Preload timed out"),
                }
            });
            scheduled += 1;
        }

        if scheduled > 0 {
            debug!(scheduled = scheduled, position = position, "Preload scheduled");
        }
        scheduled
    }

    /// Abort all outstanding preload tasks (the originating view was
    /// discarded).
    pub async fn cancel_all(&self) {
        let mut tasks = self.tasks.lock().await;
        tasks.shutdown().await;
        debug!("Preloads canceled");
    }

    /// Wait for every scheduled preload to finish or time out.
    pub async fn wait_idle(&self) {
        let mut tasks = self.tasks.lock().await;
        while tasks.join_next().await.is_some() {}
    }

    /// Number of preload tasks not yet reaped.
    pub async fn outstanding(&self) -> usize {
        self.tasks.lock().await.len()
    }
}
