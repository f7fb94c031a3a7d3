//! Data models for the catalog database.

use serde::{Deserialize, Serialize};

/// A persisted catalog item.
///
/// `id` is the primary key and is stable across fetches; rows are never
/// mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    pub price: f64,
}
