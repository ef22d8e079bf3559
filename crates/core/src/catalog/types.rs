//! Types for the catalog subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::source::RawCatalogRecord;

/// One validated catalog item, ready for listing.
///
/// Immutable after construction; held only inside the catalog cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier (never empty).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Cover image reference.
    pub cover_url: String,
    /// Number of episodes.
    pub episode_count: u32,
    /// Descriptive text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Popularity counter, string-encoded as the upstream sends it.
    pub play_count: String,
    /// Tag list (possibly empty).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Rank/promotion info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<RankInfo>,
}

impl CatalogItem {
    /// Promote a raw record to a catalog item.
    ///
    /// Returns `None` for structurally invalid records: empty identifier, or a
    /// missing/empty display name or cover reference.
    pub fn from_record(record: RawCatalogRecord) -> Option<Self> {
        if record.id.is_empty() {
            return None;
        }
        let name = record.name.filter(|n| !n.is_empty())?;
        let cover_url = record.cover_url.filter(|c| !c.is_empty())?;

        Some(Self {
            id: record.id,
            name,
            cover_url,
            episode_count: record.episode_count.unwrap_or(0),
            description: record.description,
            play_count: record.play_count.unwrap_or_else(|| "0".to_string()),
            tags: record.tags.unwrap_or_default(),
            rank: record.rank.map(|r| RankInfo {
                rank_tier: r.rank_type.unwrap_or(0),
                promo_copy: r.promo_copy,
            }),
        })
    }

    /// Case-insensitive substring match on name and description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Rank tier plus promotional copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankInfo {
    pub rank_tier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_copy: Option<String>,
}

/// A merged catalog snapshot returned to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    /// Deduplicated, validated items in canonical order.
    pub items: Vec<CatalogItem>,
    /// When the underlying cache entry was populated.
    pub fetched_at: DateTime<Utc>,
    /// Whether this snapshot was served from the cache without network access.
    pub from_cache: bool,
    /// How long producing this snapshot took in milliseconds.
    pub duration_ms: u64,
    /// Any endpoints that failed during the refresh (name -> error message).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub endpoint_errors: HashMap<String, String>,
}

/// Errors surfaced by catalog aggregation.
///
/// Partial endpoint failure is not an error; only a refresh that produced
/// nothing while at least one endpoint failed is surfaced.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("All endpoints failed")]
    AllEndpointsFailed(HashMap<String, String>),
}
