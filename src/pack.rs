//! Directory packing module
//!
//! Walks a source tree and upserts one page per regular file into a
//! store. Traversal order has no semantic effect: paths are unique keys,
//! and the last store for a duplicate path wins.

use std::path::Path;

use walkdir::WalkDir;

use crate::logger;
use crate::store::{MappedPage, Page, PageWriter};

/// Outcome of one pack run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PackSummary {
    /// Pages stored successfully
    pub stored: usize,
    /// Files that could not be read or stored
    pub failed: usize,
}

/// Pack every regular file under `root` into the writer.
///
/// A failure on one file is logged and counted but never aborts the
/// walk; the rest of the tree still packs.
pub fn pack_tree(root: &Path, writer: &PageWriter) -> PackSummary {
    let mut summary = PackSummary::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger::log_warning(&format!("Skipping unreadable entry: {e}"));
                summary.failed += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let page = match MappedPage::open(root, entry.path()) {
            Ok(page) => page,
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read '{}': {e}",
                    entry.path().display()
                ));
                summary.failed += 1;
                continue;
            }
        };

        match writer.store(&page) {
            Ok(()) => {
                logger::log_packed_file(page.path(), page.len());
                summary.stored += 1;
            }
            Err(e) => {
                logger::log_error(&e.to_string());
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PageReader;
    use std::fs;

    #[test]
    fn pack_tree_stores_nested_files() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("index.html"), b"<html></html>").unwrap();
        fs::create_dir_all(src.path().join("a")).unwrap();
        fs::write(src.path().join("a/b.txt"), b"nested").unwrap();

        let out = tempfile::tempdir().unwrap();
        let store = out.path().join("pages.db");
        let writer = PageWriter::open(&store).unwrap();
        let summary = pack_tree(src.path(), &writer);
        drop(writer);

        assert_eq!(summary.stored, 2);
        assert_eq!(summary.failed, 0);

        let reader = PageReader::open(&store).unwrap();
        let index = reader.load("/index.html").unwrap().unwrap();
        assert_eq!(index.mime_type(), "text/html");
        assert_eq!(index.content(), b"<html></html>");

        let nested = reader.load("/a/b.txt").unwrap().unwrap();
        assert_eq!(nested.mime_type(), "text/plain");
        assert_eq!(nested.content(), b"nested");
    }

    #[test]
    fn pack_tree_of_empty_directory_stores_nothing() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let store = out.path().join("pages.db");

        let writer = PageWriter::open(&store).unwrap();
        let summary = pack_tree(src.path(), &writer);

        assert_eq!(summary.stored, 0);
        assert_eq!(summary.failed, 0);
    }
}
