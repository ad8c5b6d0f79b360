//! Page reader role
//!
//! Owns an independent read-only connection. Multiple readers, or a
//! reader concurrent with a writer, may be open against the same store
//! file; the engine's locking plus the busy timeout arbitrates.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::error::StoreError;
use super::page::StoredPage;

const SCHEMA_PRESENT: &str =
    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'pages');";

const SELECT_PAGE: &str = "SELECT mime_type, content FROM pages WHERE path = ?1;";

/// Single-key lookup handle for a page store.
pub struct PageReader {
    conn: Connection,
}

impl PageReader {
    /// Open an existing page store read-only with the default lock timeout.
    pub fn open(store_path: &Path) -> Result<Self, StoreError> {
        Self::open_with_timeout(store_path, Duration::from_millis(5000))
    }

    /// Open an existing page store read-only.
    ///
    /// The page table must already exist: a foreign or corrupt file fails
    /// here instead of yielding unpredictable results at lookup time.
    pub fn open_with_timeout(
        store_path: &Path,
        busy_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let open_error = |source| StoreError::Open {
            path: store_path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(store_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(open_error)?;
        conn.busy_timeout(busy_timeout).map_err(open_error)?;

        let present: bool = conn
            .query_row(SCHEMA_PRESENT, [], |row| row.get(0))
            .map_err(open_error)?;
        if !present {
            return Err(StoreError::MissingSchema {
                path: store_path.to_path_buf(),
            });
        }

        Ok(Self { conn })
    }

    /// Exact-match lookup of one page by path.
    ///
    /// A miss is a normal outcome and returns `Ok(None)`; `Err` is
    /// reserved for engine-level failures. Performs no mutation.
    pub fn load(&self, page_path: &str) -> Result<Option<StoredPage>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(SELECT_PAGE)
            .map_err(StoreError::Query)?;

        stmt.query_row(params![page_path], |row| {
            Ok(StoredPage {
                path: page_path.to_string(),
                mime_type: row.get(0)?,
                content: row.get(1)?,
            })
        })
        .optional()
        .map_err(StoreError::Query)
    }
}
