//! SQLite-backed catalog store implementation.

use super::models::CatalogItem;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::{CatalogStore, CatalogWatcher, WatcherToken};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// SQLite-backed catalog store.
///
/// Reads go through a dedicated read-only connection so the interactive
/// side can keep querying while a bulk insert commits on the write
/// connection (WAL mode on both).
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_conn: Arc<Mutex<Connection>>,
    write_conn: Arc<Mutex<Connection>>,
    watchers: Arc<Mutex<HashMap<usize, CatalogWatcher>>>,
    next_watcher_id: Arc<AtomicUsize>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let mut current_version = if db_version < BASE_DB_VERSION as i64 {
        0
    } else {
        (db_version - BASE_DB_VERSION as i64) as usize
    };

    if current_version >= latest_version {
        return latest_schema.validate(conn);
    }

    let tx = conn.transaction()?;
    for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating catalog db from version {} to {}",
                current_version, schema.version
            );
            migration_fn(&tx)?;
            current_version = schema.version;
        }
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    tx.commit()?;
    Ok(())
}

impl SqliteCatalogStore {
    /// Create a new SqliteCatalogStore.
    ///
    /// Opens an existing database or creates a new one with the current
    /// schema.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        migrate_if_needed(&mut write_conn)?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on catalog write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database for reading")?;

        read_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on catalog read connection")?;

        let item_count = Self::count_items(&read_conn)?;
        info!("Catalog store ready: {} items", item_count);

        Ok(Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
            watchers: Arc::new(Mutex::new(HashMap::new())),
            next_watcher_id: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn count_items(conn: &Connection) -> Result<usize> {
        let count: usize = conn.query_row("SELECT COUNT(*) FROM catalog_items", [], |r| r.get(0))?;
        Ok(count)
    }

    /// Call every watcher with a fresh snapshot. Must not be invoked while
    /// holding a connection lock.
    fn notify_watchers(&self) {
        let snapshot = match self.get_all() {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to read catalog snapshot for watchers: {}", e);
                return;
            }
        };
        let watchers = self.watchers.lock().unwrap();
        for watcher in watchers.values() {
            watcher(&snapshot);
        }
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn is_empty(&self) -> Result<bool> {
        let conn = self.read_conn.lock().unwrap();
        Ok(Self::count_items(&conn)? == 0)
    }

    fn insert_all(&self, items: &[CatalogItem]) -> Result<()> {
        {
            let conn = self.write_conn.lock().unwrap();
            let tx = conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT OR REPLACE INTO catalog_items (id, title, price)
                     VALUES (?1, ?2, ?3)",
                )?;
                for item in items {
                    stmt.execute(params![item.id, item.title, item.price])?;
                }
            }
            tx.commit()?;
        }
        self.notify_watchers();
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<CatalogItem>> {
        let conn = self.read_conn.lock().unwrap();
        let mut stmt = conn
            .prepare_cached("SELECT id, title, price FROM catalog_items ORDER BY rowid")?;
        let items = stmt
            .query_map([], |row| {
                Ok(CatalogItem {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    price: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn subscribe(&self, watcher: CatalogWatcher) -> WatcherToken {
        let id = self.next_watcher_id.fetch_add(1, Ordering::Relaxed);
        self.watchers.lock().unwrap().insert(id, watcher);
        WatcherToken(id)
    }

    fn unsubscribe(&self, token: WatcherToken) {
        self.watchers.lock().unwrap().remove(&token.0);
    }
}
