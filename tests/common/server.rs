//! Fixture HTTP server for end-to-end sync tests.

use axum::{routing::get, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A real HTTP server on an ephemeral port serving a fixed catalog
/// document and counting how many times it was fetched.
pub struct TestCatalogServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl TestCatalogServer {
    /// Spawn the server, serving `body` at `/menu.json`.
    pub async fn spawn(body: &'static str) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));

        let handler_hits = hits.clone();
        let app = Router::new().route(
            "/menu.json",
            get(move || {
                let hits = handler_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    body
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    /// URL of the served catalog document.
    pub fn menu_url(&self) -> String {
        format!("{}/menu.json", self.base_url)
    }

    /// How many times the document was requested.
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
