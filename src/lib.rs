//! # Pagevault
//!
//! Packages a directory tree of static files into a single portable
//! archive keyed by URL path, and serves that archive over HTTP.
//!
//! The core is the page store: a SQLite-backed blob repository with a
//! bulk-writer role ([`store::PageWriter`]) used at pack time and a
//! single-key reader role ([`store::PageReader`]) used at serve time.
//! The HTTP dispatcher ([`server::Server`]) maps request paths to reader
//! lookups on a single dispatch thread.
//!
//! Two binaries drive the library: `pagevault-pack` walks a source tree
//! into a store, and `pagevault-serve` serves a store until signalled.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod pack;
pub mod server;
pub mod store;

pub use config::Config;
pub use server::{ServeError, Server};
pub use store::{MappedPage, Page, PageReader, PageWriter, StoredPage, StoreError};
