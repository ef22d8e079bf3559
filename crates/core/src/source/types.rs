//! Types for the remote source boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One catalog record as the upstream feed endpoints return it.
///
/// Everything except the identifier is optional on the wire; structural
/// validation happens later, when the record is promoted to a `CatalogItem`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCatalogRecord {
    #[serde(rename = "bookId")]
    pub id: String,
    #[serde(rename = "bookName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "coverWap", default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(
        rename = "chapterCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub episode_count: Option<u32>,
    #[serde(
        rename = "introduction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "playCount", default, skip_serializing_if = "Option::is_none")]
    pub play_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "rankVo", default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<RawRankInfo>,
}

/// Rank/promotion block attached to some catalog records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRankInfo {
    #[serde(rename = "rankType", default)]
    pub rank_type: Option<i32>,
    #[serde(rename = "recCopy", default, skip_serializing_if = "Option::is_none")]
    pub promo_copy: Option<String>,
}

/// One episode record from the per-item episode listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEpisodeRecord {
    #[serde(rename = "chapterId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "chapterName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(rename = "cdnList", default)]
    pub cdn_list: Vec<RawCdnGroup>,
}

/// One CDN provider's rendition list for an episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCdnGroup {
    #[serde(rename = "videoPathList", default)]
    pub renditions: Vec<RawRendition>,
}

/// A single playable rendition candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRendition {
    pub quality: u32,
    #[serde(rename = "videoPath", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Errors that can occur when talking to the remote source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for the remote drama source.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch one catalog feed endpoint (e.g., "foryou", "latest", "trending").
    async fn fetch_endpoint(&self, endpoint: &str)
        -> Result<Vec<RawCatalogRecord>, SourceError>;

    /// Fetch the episode listing for one catalog item.
    async fn fetch_episodes(&self, item_id: &str)
        -> Result<Vec<RawEpisodeRecord>, SourceError>;
}
