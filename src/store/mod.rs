//! Page store module
//!
//! A content repository addressed by URL path, backed by a single SQLite
//! file holding one unique-keyed relation `path -> (mime_type, content)`.
//! Two access roles exist: [`PageWriter`] bulk-upserts pages at pack time
//! and [`PageReader`] resolves one path per lookup at serve time. Each
//! role owns its own engine handle with role-specific open behavior.

mod error;
mod page;
mod reader;
mod writer;

pub use error::StoreError;
pub use page::{MappedPage, Page, StoredPage};
pub use reader::PageReader;
pub use writer::PageWriter;
