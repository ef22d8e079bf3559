//! Quality-preference selection over candidate renditions.

use super::types::Rendition;

/// Preferred quality tier.
pub const HIGH_QUALITY: u32 = 720;
/// Fallback quality tier.
pub const STANDARD_QUALITY: u32 = 540;

/// Select the best playable URL from a rendition list.
///
/// Preference order: the first rendition at the high tier, then the first at
/// the standard tier, then the first rendition with a non-empty path. A tier's
/// first rendition is only usable if its path is non-empty; an empty path at a
/// tier falls through to the next preference.
pub fn best_url(renditions: &[Rendition]) -> Option<&str> {
    let at_tier = |quality: u32| {
        renditions
            .iter()
            .find(|r| r.quality == quality)
            .filter(|r| !r.path.is_empty())
    };

    at_tier(HIGH_QUALITY)
        .or_else(|| at_tier(STANDARD_QUALITY))
        .or_else(|| renditions.iter().find(|r| !r.path.is_empty()))
        .map(|r| r.path.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendition(quality: u32, path: &str) -> Rendition {
        Rendition {
            quality,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_prefers_high_tier() {
        let renditions = vec![
            rendition(540, "sd.m3u8"),
            rendition(720, "hd.m3u8"),
            rendition(1080, "fhd.m3u8"),
        ];
        assert_eq!(best_url(&renditions), Some("hd.m3u8"));
    }

    #[test]
    fn test_falls_back_to_standard_tier() {
        let renditions = vec![rendition(1080, "fhd.m3u8"), rendition(540, "sd.m3u8")];
        assert_eq!(best_url(&renditions), Some("sd.m3u8"));
    }

    #[test]
    fn test_falls_back_to_first_non_empty() {
        let renditions = vec![rendition(360, ""), rendition(1080, "fhd.m3u8")];
        assert_eq!(best_url(&renditions), Some("fhd.m3u8"));
    }

    #[test]
    fn test_empty_path_at_preferred_tier_falls_through() {
        let renditions = vec![rendition(720, ""), rendition(540, "sd.m3u8")];
        assert_eq!(best_url(&renditions), Some("sd.m3u8"));
    }

    #[test]
    fn test_no_usable_url() {
        assert_eq!(best_url(&[]), None);
        let renditions = vec![rendition(720, ""), rendition(540, "")];
        assert_eq!(best_url(&renditions), None);
    }

    #[test]
    fn test_first_at_tier_wins() {
        let renditions = vec![rendition(720, "a.m3u8"), rendition(720, "b.m3u8")];
        assert_eq!(best_url(&renditions), Some("a.m3u8"));
    }
}
