//! Merging of per-endpoint catalog records into one deduplicated item list.

use std::collections::HashSet;

use tracing::debug;

use crate::source::RawCatalogRecord;

use super::types::CatalogItem;

/// Result of a merge, with drop counters for diagnostics.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Validated items, first occurrence order across endpoints.
    pub items: Vec<CatalogItem>,
    /// Later occurrences of an already seen id.
    pub duplicates_dropped: usize,
    /// Records missing a display name or cover reference.
    pub invalid_dropped: usize,
}

/// Merge per-endpoint record batches into one deduplicated, validated list.
///
/// Batches must be passed in endpoint priority order; that order is the
/// tie-break for duplicate ids, so the merge is deterministic regardless of
/// which fetch finished first. Structurally invalid records are dropped before
/// deduplication, so an invalid record never shadows a valid duplicate from a
/// later endpoint.
pub fn merge_records(batches: Vec<(String, Vec<RawCatalogRecord>)>) -> MergeOutcome {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items: Vec<CatalogItem> = Vec::new();
    let mut duplicates_dropped = 0;
    let mut invalid_dropped = 0;

    for (endpoint, records) in batches {
        let batch_len = records.len();
        for record in records {
            let Some(item) = CatalogItem::from_record(record) else {
                invalid_dropped += 1;
                continue;
            };
            if seen.contains(&item.id) {
                duplicates_dropped += 1;
                debug!(endpoint = %endpoint, item_id = %item.id, "Dropping duplicate item");
                continue;
            }
            seen.insert(item.id.clone());
            items.push(item);
        }
        debug!(
            endpoint = %endpoint,
            records = batch_len,
            merged_total = items.len(),
            "Merged endpoint batch"
        );
    }

    MergeOutcome {
        items,
        duplicates_dropped,
        invalid_dropped,
    }
}
