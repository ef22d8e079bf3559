use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub preload: PreloadConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Remote source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Base URL of the upstream API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_source_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://dramabox.sansekai.my.id/api".to_string()
}

fn default_source_timeout() -> u64 {
    30
}

/// Catalog aggregation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Feed endpoints to aggregate, in priority order. The order doubles as the
    /// tie-break for duplicate item ids: the earlier endpoint wins.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    /// How long a populated catalog stays fresh, in seconds (default: 300)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl CatalogConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            ttl_secs: default_ttl(),
        }
    }
}

fn default_endpoints() -> Vec<String> {
    vec![
        "foryou".to_string(),
        "latest".to_string(),
        "trending".to_string(),
    ]
}

fn default_ttl() -> u64 {
    300
}

/// Outbound rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Minimum spacing between outbound calls, in milliseconds (default: 1000)
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
    /// Fixed extra pause after an upstream 429, in seconds (default: 5)
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
}

impl RateLimitConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval(),
            cooldown_secs: default_cooldown(),
        }
    }
}

fn default_min_interval() -> u64 {
    1000
}

fn default_cooldown() -> u64 {
    5
}

/// Preload pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreloadConfig {
    /// How many upcoming items to resolve ahead of the viewed position (default: 5)
    #[serde(default = "default_preload_count")]
    pub count: usize,
    /// Per-item resolution timeout in seconds (default: 15)
    #[serde(default = "default_preload_timeout")]
    pub timeout_secs: u64,
}

impl PreloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            count: default_preload_count(),
            timeout_secs: default_preload_timeout(),
        }
    }
}

fn default_preload_count() -> usize {
    5
}

fn default_preload_timeout() -> u64 {
    15
}

/// Stream resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Placeholder stream returned by `playable_url` when resolution comes up empty.
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            fallback_url: default_fallback_url(),
        }
    }
}

fn default_fallback_url() -> String {
    "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8".to_string()
}
