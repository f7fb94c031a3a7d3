//! Common test infrastructure
//!
//! Spawns a real HTTP server on an ephemeral port serving a catalog
//! document, so the sync flow is exercised end-to-end over the wire.

mod server;

pub use server::TestCatalogServer;

/// The document from the end-to-end scenario: two items, string prices.
pub const SAMPLE_MENU_DOC: &str =
    r#"{"menu":[{"id":1,"title":"Lemon Dessert","price":"5"},{"id":2,"title":"Falafel","price":"7"}]}"#;
