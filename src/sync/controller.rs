//! Sync orchestration: populate the local store from the remote source.

use crate::catalog_store::{CatalogItem, CatalogStore};
use crate::remote::{CatalogSource, FetchError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

/// Errors propagated by [`SyncController::ensure_synced`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// What a completed `ensure_synced` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The store already held items; no network call was made.
    AlreadyPopulated,
    /// The store was empty and has been populated with this many items.
    Populated(usize),
}

/// Stateless orchestration over a remote source and a local store.
///
/// Holds no catalog data of its own; the store owns the durable copy.
pub struct SyncController {
    source: Arc<dyn CatalogSource>,
    store: Arc<dyn CatalogStore>,
    // Serializes re-entrant calls so the empty-check and the fetch of two
    // invocations cannot interleave into two concurrent downloads.
    flight: Mutex<()>,
}

impl SyncController {
    pub fn new(source: Arc<dyn CatalogSource>, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            source,
            store,
            flight: Mutex::new(()),
        }
    }

    /// Populate the store from the remote source if, and only if, the
    /// store is empty.
    ///
    /// A populated store is never overwritten or re-fetched, even across
    /// repeated calls. A failed fetch or write leaves the store empty, so
    /// the next call retries naturally.
    pub async fn ensure_synced(&self) -> Result<SyncOutcome, SyncError> {
        let _flight = self.flight.lock().await;

        if !self.store.is_empty()? {
            return Ok(SyncOutcome::AlreadyPopulated);
        }

        let document = self.source.fetch_catalog().await?;
        let items: Vec<CatalogItem> = document
            .items
            .iter()
            .map(|item| item.to_catalog_item())
            .collect();
        self.store.insert_all(&items)?;

        info!("Catalog populated with {} items", items.len());
        Ok(SyncOutcome::Populated(items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::{CatalogWatcher, SqliteCatalogStore, WatcherToken};
    use crate::remote::RemoteCatalogDocument;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    struct StubSource {
        responses: std::sync::Mutex<VecDeque<Result<RemoteCatalogDocument, FetchError>>>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl StubSource {
        fn new(responses: Vec<Result<RemoteCatalogDocument, FetchError>>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for StubSource {
        async fn fetch_catalog(&self) -> Result<RemoteCatalogDocument, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch_catalog call")
        }
    }

    fn sample_document() -> RemoteCatalogDocument {
        serde_json::from_str(
            r#"{"menu":[
                {"id": 1, "title": "Lemon Dessert", "price": "5"},
                {"id": 2, "title": "Falafel", "price": "7"}
            ]}"#,
        )
        .unwrap()
    }

    fn decode_error() -> FetchError {
        FetchError::Decode(serde_json::from_str::<RemoteCatalogDocument>("{}").unwrap_err())
    }

    fn create_test_store() -> (Arc<SqliteCatalogStore>, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(tmp.path().join("catalog.db")).unwrap();
        (Arc::new(store), tmp)
    }

    #[tokio::test]
    async fn test_populates_empty_store_at_most_once() {
        let (store, _tmp) = create_test_store();
        let source = Arc::new(StubSource::new(vec![Ok(sample_document())]));
        let controller = SyncController::new(source.clone(), store.clone());

        let first = controller.ensure_synced().await.unwrap();
        assert_eq!(first, SyncOutcome::Populated(2));

        let second = controller.ensure_synced().await.unwrap();
        assert_eq!(second, SyncOutcome::AlreadyPopulated);

        assert_eq!(source.call_count(), 1);
        assert_eq!(store.get_all().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_populated_store_is_never_refetched() {
        let (store, _tmp) = create_test_store();
        store
            .insert_all(&[CatalogItem {
                id: 1,
                title: "Hummus".to_string(),
                price: 10.0,
            }])
            .unwrap();

        // A scripted response would panic if fetched; no fetch must happen.
        let source = Arc::new(StubSource::new(vec![]));
        let controller = SyncController::new(source.clone(), store.clone());

        let outcome = controller.ensure_synced().await.unwrap();
        assert_eq!(outcome, SyncOutcome::AlreadyPopulated);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_empty_and_next_call_retries() {
        let (store, _tmp) = create_test_store();
        let source = Arc::new(StubSource::new(vec![
            Err(decode_error()),
            Ok(sample_document()),
        ]));
        let controller = SyncController::new(source.clone(), store.clone());

        let first = controller.ensure_synced().await;
        assert!(matches!(first, Err(SyncError::Fetch(_))));
        assert!(store.is_empty().unwrap());

        let second = controller.ensure_synced().await.unwrap();
        assert_eq!(second, SyncOutcome::Populated(2));
        assert_eq!(source.call_count(), 2);
    }

    struct FailingStore;

    impl CatalogStore for FailingStore {
        fn is_empty(&self) -> anyhow::Result<bool> {
            Ok(true)
        }
        fn insert_all(&self, _items: &[CatalogItem]) -> anyhow::Result<()> {
            bail!("disk full")
        }
        fn get_all(&self) -> anyhow::Result<Vec<CatalogItem>> {
            Ok(vec![])
        }
        fn subscribe(&self, _watcher: CatalogWatcher) -> WatcherToken {
            WatcherToken(0)
        }
        fn unsubscribe(&self, _token: WatcherToken) {}
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let source = Arc::new(StubSource::new(vec![Ok(sample_document())]));
        let controller = SyncController::new(source.clone(), Arc::new(FailingStore));

        let result = controller.ensure_synced().await;
        assert!(matches!(result, Err(SyncError::Storage(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_calls_fetch_once() {
        let (store, _tmp) = create_test_store();
        // A single scripted response: a second fetch would panic.
        let source = Arc::new(
            StubSource::new(vec![Ok(sample_document())])
                .with_delay(Duration::from_millis(50)),
        );
        let controller = Arc::new(SyncController::new(source.clone(), store.clone()));

        let a = controller.clone();
        let b = controller.clone();
        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { a.ensure_synced().await }),
            tokio::spawn(async move { b.ensure_synced().await }),
        );
        let outcomes = [ra.unwrap().unwrap(), rb.unwrap().unwrap()];

        assert_eq!(source.call_count(), 1);
        assert!(outcomes.contains(&SyncOutcome::Populated(2)));
        assert!(outcomes.contains(&SyncOutcome::AlreadyPopulated));
        assert_eq!(store.get_all().unwrap().len(), 2);
    }
}
