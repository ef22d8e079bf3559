//! Testing utilities and the mock source client.
//!
//! Public (not `cfg(test)`) so integration tests and embedding applications
//! can exercise the full service without real network access.

mod mock_source;

pub use mock_source::MockSourceClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::source::{
        RawCatalogRecord, RawCdnGroup, RawEpisodeRecord, RawRendition,
    };

    /// A valid catalog record with reasonable defaults.
    pub fn catalog_record(id: &str, name: &str, cover: &str) -> RawCatalogRecord {
        RawCatalogRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            cover_url: Some(cover.to_string()),
            episode_count: Some(24),
            description: None,
            play_count: Some("1000".to_string()),
            tags: Some(vec!["drama".to_string()]),
            rank: None,
        }
    }

    /// A structurally invalid record (no display name).
    pub fn invalid_record(id: &str) -> RawCatalogRecord {
        RawCatalogRecord {
            id: id.to_string(),
            name: None,
            cover_url: Some("cover".to_string()),
            episode_count: None,
            description: None,
            play_count: None,
            tags: None,
            rank: None,
        }
    }

    /// An episode with one CDN group holding the given renditions.
    pub fn episode_with_renditions(renditions: &[(u32, &str)]) -> RawEpisodeRecord {
        RawEpisodeRecord {
            id: Some("ch1".to_string()),
            name: Some("EP 1".to_string()),
            cdn_list: vec![RawCdnGroup {
                renditions: renditions
                    .iter()
                    .map(|(quality, path)| RawRendition {
                        quality: *quality,
                        path: Some(path.to_string()),
                    })
                    .collect(),
            }],
        }
    }

    /// An episode with a single 720p rendition.
    pub fn episode_720(path: &str) -> RawEpisodeRecord {
        episode_with_renditions(&[(720, path)])
    }
}
