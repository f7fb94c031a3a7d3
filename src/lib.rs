//! Catalog Browser core library
//!
//! Local-first catalog synchronization and query layer: fetch the catalog
//! document from the remote source at most once, persist it to SQLite, and
//! serve sorted/filtered views computed over the local copy.

pub mod catalog_store;
pub mod query;
pub mod remote;
pub mod sqlite_persistence;
pub mod sync;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogItem, CatalogStore, SqliteCatalogStore};
pub use query::{apply_search_filter, apply_title_sort};
pub use remote::{CatalogSource, FetchError, HttpCatalogSource, DEFAULT_CATALOG_URL};
pub use sync::{SyncController, SyncError, SyncOutcome};
