//! CatalogStore trait definition.

use super::models::CatalogItem;
use anyhow::Result;

/// Callback invoked with a fresh snapshot whenever the catalog changes.
pub type CatalogWatcher = Box<dyn Fn(&[CatalogItem]) + Send + Sync>;

/// Handle returned by [`CatalogStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatcherToken(pub(crate) usize);

/// Trait for catalog storage backends.
pub trait CatalogStore: Send + Sync {
    /// True iff zero catalog items are persisted.
    fn is_empty(&self) -> Result<bool>;

    /// Bulk-write items, keyed by `id`, in a single transaction.
    ///
    /// Re-inserting an existing `id` replaces the row; duplicate visible
    /// rows are impossible. Watchers are notified after the commit.
    fn insert_all(&self, items: &[CatalogItem]) -> Result<()>;

    /// All persisted items in storage order (not guaranteed sorted).
    fn get_all(&self) -> Result<Vec<CatalogItem>>;

    /// Register a watcher to be called with a snapshot after every commit.
    fn subscribe(&self, watcher: CatalogWatcher) -> WatcherToken;

    /// Remove a previously registered watcher.
    fn unsubscribe(&self, token: WatcherToken);
}
