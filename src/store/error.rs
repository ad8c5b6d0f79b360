//! Store error types
//!
//! Open-time failures are fatal to the component attempting the open;
//! per-page write failures are contained at the item level by the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the page store roles.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database could not be opened (bad path, permission,
    /// corruption). Fatal to the writer or reader being constructed.
    #[error("failed to open page store '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The file opened cleanly but carries no page table, so it is not a
    /// page store. Fatal to the reader being constructed.
    #[error("'{path}' is not a page store: missing page table")]
    MissingSchema { path: PathBuf },

    /// A single upsert failed. The writer stays usable; later stores may
    /// still succeed.
    #[error("failed to store page '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An engine-level lookup failure, distinct from a normal miss.
    #[error("page lookup failed: {0}")]
    Query(#[source] rusqlite::Error),
}
