//! Feed lifecycle integration tests.
//!
//! These drive the full service surface the way an interactive client would:
//! browse the catalog, resolve stream URLs on visibility, preload ahead of
//! the scroll position, and recover from upstream failures.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::Duration;
use tokio_test::assert_ok;

use dramafeed_core::{
    testing::{fixtures, MockSourceClient},
    CatalogService, Config, SourceClient,
};

/// Test helper wiring a mock upstream into a fully configured service.
struct TestHarness {
    client: Arc<MockSourceClient>,
    service: CatalogService,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    async fn with_config(mut config: Config) -> Self {
        // Dispatch spacing is exercised by its own test below; keep it out of
        // the way everywhere else.
        config.rate_limit.min_interval_ms = 0;

        let client = Arc::new(MockSourceClient::new());
        let service = CatalogService::new(Arc::clone(&client) as Arc<dyn SourceClient>, &config);

        Self { client, service }
    }

    async fn seed_default_feeds(&self) {
        self.client
            .set_endpoint_records(
                "foryou",
                vec![
                    fixtures::catalog_record("101", "Love Storm", "cover-101"),
                    fixtures::catalog_record("102", "Night Shift", "cover-102"),
                ],
            )
            .await;
        self.client
            .set_endpoint_records(
                "latest",
                vec![
                    // Duplicate of the for-you feed on purpose
                    fixtures::catalog_record("101", "Love Storm", "cover-101"),
                    fixtures::catalog_record("103", "The Heir", "cover-103"),
                ],
            )
            .await;
        self.client
            .set_endpoint_records(
                "trending",
                vec![
                    fixtures::catalog_record("104", "Second Chance", "cover-104"),
                    fixtures::invalid_record("105"),
                ],
            )
            .await;

        for id in ["101", "102", "103", "104"] {
            self.client
                .set_episodes(
                    id,
                    vec![fixtures::episode_with_renditions(&[
                        (540, &format!("https://cdn.example/{}/540.m3u8", id)),
                        (720, &format!("https://cdn.example/{}/720.m3u8", id)),
                    ])],
                )
                .await;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_browse_and_play_flow() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;

    // Initial load hits every endpoint once
    let catalog = assert_ok!(harness.service.catalog().await);
    assert_eq!(harness.client.endpoint_call_count().await, 3);

    // Merged, validated, deduplicated
    let ids: Vec<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["101", "102", "103", "104"]);
    for item in &catalog.items {
        assert!(!item.id.is_empty());
        assert!(!item.name.is_empty());
        assert!(!item.cover_url.is_empty());
    }

    // First item becomes visible and resolves to its best rendition
    let url = assert_ok!(harness.service.resolve_url("101").await);
    assert_eq!(url, "https://cdn.example/101/720.m3u8");

    // Scrolling triggers preloads for the following items
    let scheduled = harness.service.preload_after(0).await;
    assert_eq!(scheduled, 3);

    let stats = harness.service.stats().await;
    assert_eq!(stats.catalog_items, 4);
}

#[tokio::test(start_paused = true)]
async fn test_catalog_is_cached_within_ttl_and_refreshed_after() {
    let mut config = Config::default();
    config.catalog.ttl_secs = 300;
    let harness = TestHarness::with_config(config).await;
    harness.seed_default_feeds().await;

    assert_ok!(harness.service.catalog().await);
    let second = assert_ok!(harness.service.catalog().await);
    assert!(second.from_cache);
    assert_eq!(harness.client.endpoint_call_count().await, 3);

    tokio::time::sleep(Duration::from_secs(301)).await;

    let refreshed = assert_ok!(harness.service.catalog().await);
    assert!(!refreshed.from_cache);
    assert_eq!(harness.client.endpoint_call_count().await, 6);
}

#[tokio::test(start_paused = true)]
async fn test_simultaneous_resolutions_share_one_call() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;
    harness.client.set_latency(Duration::from_millis(200)).await;

    let (a, b) = tokio::join!(
        harness.service.resolve_url("102"),
        harness.service.resolve_url("102"),
    );

    let (a, b) = (assert_ok!(a), assert_ok!(b));
    assert_eq!(a, b);
    assert_eq!(harness.client.episode_calls_for("102").await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shuffle_serves_load_more_without_network() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;

    let catalog = assert_ok!(harness.service.catalog().await);
    let calls_after_load = harness.client.endpoint_call_count().await;

    let shuffled = harness.service.shuffle().await;

    assert_eq!(harness.client.endpoint_call_count().await, calls_after_load);
    let before: HashSet<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();
    let after: HashSet<&str> = shuffled.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(before, after);
    assert_eq!(shuffled.len(), catalog.items.len());
}

#[tokio::test(start_paused = true)]
async fn test_degraded_upstream_still_serves_partial_catalog() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;
    harness
        .client
        .set_endpoint_error(
            "trending",
            dramafeed_core::SourceError::ConnectionFailed("down".to_string()),
        )
        .await;

    let catalog = assert_ok!(harness.service.catalog().await);
    assert_eq!(catalog.items.len(), 3);
    assert!(catalog.endpoint_errors.contains_key("trending"));
}

#[tokio::test(start_paused = true)]
async fn test_invalidate_then_reload_picks_up_new_content() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;

    assert_ok!(harness.service.catalog().await);

    harness
        .client
        .set_endpoint_records(
            "foryou",
            vec![fixtures::catalog_record("201", "Fresh Drop", "cover-201")],
        )
        .await;
    harness
        .client
        .set_endpoint_records("latest", Vec::new())
        .await;
    harness
        .client
        .set_endpoint_records("trending", Vec::new())
        .await;

    harness.service.invalidate().await;
    let catalog = assert_ok!(harness.service.catalog().await);

    assert_eq!(catalog.items.len(), 1);
    assert_eq!(catalog.items[0].id, "201");
}

#[tokio::test(start_paused = true)]
async fn test_preload_then_visible_item_needs_no_network() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;

    assert_ok!(harness.service.catalog().await);
    harness.service.preload_after(0).await;

    // Let the preloads drain
    tokio::time::sleep(Duration::from_secs(1)).await;

    let calls_before = harness.client.episode_call_count().await;
    let url = assert_ok!(harness.service.resolve_url("102").await);
    assert_eq!(url, "https://cdn.example/102/720.m3u8");
    assert_eq!(harness.client.episode_call_count().await, calls_before);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limiter_spaces_resolutions_for_distinct_items() {
    let mut config = Config::default();
    config.rate_limit.min_interval_ms = 500;
    let client = Arc::new(MockSourceClient::new());
    let service = CatalogService::new(Arc::clone(&client) as Arc<dyn SourceClient>, &config);

    client
        .set_episodes("1", vec![fixtures::episode_720("one.m3u8")])
        .await;
    client
        .set_episodes("2", vec![fixtures::episode_720("two.m3u8")])
        .await;

    let start = tokio::time::Instant::now();
    let (a, b) = tokio::join!(service.resolve_url("1"), service.resolve_url("2"));
    assert_ok!(a);
    assert_ok!(b);

    // Two distinct ids resolve concurrently but their dispatches are spaced
    assert!(start.elapsed() >= Duration::from_millis(500));
    assert_eq!(client.episode_call_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_episode_listing_for_detail_view() {
    let harness = TestHarness::new().await;
    harness
        .client
        .set_episodes(
            "101",
            vec![
                fixtures::episode_720("ep1.m3u8"),
                fixtures::episode_720("ep2.m3u8"),
                fixtures::episode_with_renditions(&[]),
            ],
        )
        .await;

    let episodes = assert_ok!(harness.service.episodes("101").await);
    assert_eq!(episodes.len(), 3);
    assert_eq!(episodes[0].best_url(), Some("ep1.m3u8"));
    assert!(episodes[2].best_url().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_clear_resolved_urls_allows_re_resolution() {
    let harness = TestHarness::new().await;
    harness.seed_default_feeds().await;

    assert_ok!(harness.service.resolve_url("101").await);
    assert_eq!(harness.client.episode_calls_for("101").await, 1);

    assert_ok!(harness.service.resolve_url("101").await);
    assert_eq!(harness.client.episode_calls_for("101").await, 1);

    harness.service.clear_resolved_urls().await;
    assert_ok!(harness.service.resolve_url("101").await);
    assert_eq!(harness.client.episode_calls_for("101").await, 2);
}
