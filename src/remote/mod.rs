mod client;
mod models;

pub use client::{CatalogSource, FetchError, HttpCatalogSource, DEFAULT_CATALOG_URL};
pub use models::{RemoteCatalogDocument, RemoteCatalogItem};
