//! Types for stream resolution.

use thiserror::Error;

use crate::source::RawEpisodeRecord;

use super::select;

/// One episode with its candidate renditions.
#[derive(Debug, Clone)]
pub struct Episode {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Candidate renditions from the episode's first CDN group.
    pub renditions: Vec<Rendition>,
}

/// A single playable rendition.
#[derive(Debug, Clone)]
pub struct Rendition {
    /// Quality tier (e.g., 720, 540).
    pub quality: u32,
    /// Playable path; may be empty when the upstream omits it.
    pub path: String,
}

impl Episode {
    /// Build an episode from a raw record, flattening to the first CDN
    /// group's rendition list.
    pub fn from_record(record: RawEpisodeRecord) -> Self {
        let renditions = record
            .cdn_list
            .into_iter()
            .next()
            .map(|group| {
                group
                    .renditions
                    .into_iter()
                    .map(|r| Rendition {
                        quality: r.quality,
                        path: r.path.unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: record.id,
            name: record.name,
            renditions,
        }
    }

    /// The best playable URL for this episode, if any.
    pub fn best_url(&self) -> Option<&str> {
        select::best_url(&self.renditions)
    }
}

/// Errors surfaced by stream resolution.
///
/// `Clone` because one resolution's outcome is shared with every concurrent
/// waiter for the same item id.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Source request failed: {0}")]
    Source(String),

    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("Resolution task aborted")]
    TaskFailed,
}
