//! Derived views over a catalog snapshot.
//!
//! Pure functions: the sort toggle and the search phrase are explicit
//! parameters, and nothing here touches storage or shared state.

use crate::catalog_store::CatalogItem;

/// Order a snapshot by title when `enabled`, otherwise keep storage order.
///
/// The sort is stable and case-sensitive; applying it to an already
/// sorted snapshot is a no-op.
pub fn apply_title_sort(mut items: Vec<CatalogItem>, enabled: bool) -> Vec<CatalogItem> {
    if enabled {
        items.sort_by(|a, b| a.title.cmp(&b.title));
    }
    items
}

/// Keep the items whose title contains `phrase`, case-folded.
///
/// An empty phrase returns the snapshot unchanged. Order-preserving, so
/// it composes with [`apply_title_sort`] in either order.
pub fn apply_search_filter(items: Vec<CatalogItem>, phrase: &str) -> Vec<CatalogItem> {
    if phrase.is_empty() {
        return items;
    }
    let needle = phrase.to_lowercase();
    items
        .into_iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .collect()
}
