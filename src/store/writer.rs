//! Page writer role
//!
//! Exclusively owns a read-write connection to the store for its lifetime.
//! Opening creates the database and schema if absent; `store` is an
//! idempotent upsert keyed by page path.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection};

use super::error::StoreError;
use super::page::Page;

const CREATE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS pages (
    path      TEXT PRIMARY KEY,
    mime_type TEXT NOT NULL,
    content   BLOB NOT NULL
);";

const UPSERT_PAGE: &str =
    "INSERT OR REPLACE INTO pages (path, mime_type, content) VALUES (?1, ?2, ?3);";

/// Bulk-writer handle for a page store.
pub struct PageWriter {
    conn: Connection,
}

impl PageWriter {
    /// Open or create a page store with the default lock timeout.
    pub fn open(store_path: &Path) -> Result<Self, StoreError> {
        Self::open_with_timeout(store_path, Duration::from_millis(5000))
    }

    /// Open or create a page store, bounding waits on the engine's lock
    /// so a concurrent reader never stalls the writer indefinitely.
    pub fn open_with_timeout(
        store_path: &Path,
        busy_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let open_error = |source| StoreError::Open {
            path: store_path.to_path_buf(),
            source,
        };

        let conn = Connection::open(store_path).map_err(open_error)?;
        conn.busy_timeout(busy_timeout).map_err(open_error)?;
        // Rollback journal keeps the single-file archive self-contained;
        // WAL would leave -wal/-shm companions next to it.
        conn.query_row("PRAGMA journal_mode = DELETE", [], |_| Ok(()))
            .map_err(open_error)?;
        conn.execute_batch(CREATE_SCHEMA).map_err(open_error)?;

        Ok(Self { conn })
    }

    /// Upsert a page keyed by its path, replacing the MIME type and
    /// content wholesale on conflict. A failure leaves the writer usable
    /// for subsequent stores.
    pub fn store(&self, page: &dyn Page) -> Result<(), StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(UPSERT_PAGE)
            .map_err(|source| StoreError::Write {
                path: page.path().to_string(),
                source,
            })?;

        stmt.execute(params![page.path(), page.mime_type(), page.content()])
            .map_err(|source| StoreError::Write {
                path: page.path().to_string(),
                source,
            })?;

        Ok(())
    }
}
