//! Page value abstraction
//!
//! A page is one stored unit of content addressed by a URL-style path.
//! Two producers exist: [`MappedPage`] feeds pack-time content from a
//! read-only file mapping, and [`StoredPage`] carries a row fetched from
//! the store. The store itself only ever sees the [`Page`] capability set.

use std::fs::File;
use std::io;
use std::path::Path;

use memmap2::Mmap;

use crate::http::mime;

/// Capability set shared by every page producer.
pub trait Page {
    /// URL path of the page, always starting with `/`.
    fn path(&self) -> &str;

    /// MIME type resolved when the page was produced.
    fn mime_type(&self) -> &str;

    /// Raw content bytes.
    fn content(&self) -> &[u8];

    /// Content length in bytes.
    fn len(&self) -> usize {
        self.content().len()
    }

    /// Returns true for zero-length content.
    fn is_empty(&self) -> bool {
        self.content().is_empty()
    }
}

/// A pack-time page whose content lives in a read-only mapping of a
/// source file.
pub struct MappedPage {
    path: String,
    mime_type: &'static str,
    // Zero-length files cannot be mapped; they are represented as None
    // and read back as the empty slice.
    map: Option<Mmap>,
}

impl MappedPage {
    /// Build a page from a file under `root`, deriving the URL path from
    /// the file's location relative to `root`.
    pub fn open(root: &Path, file_path: &Path) -> io::Result<Self> {
        let relative = file_path.strip_prefix(root).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not under the source root", file_path.display()),
            )
        })?;

        let mut path = String::from("/");
        path.push_str(&url_path(relative));

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let mime_type = mime::resolve(&file_name);

        let file = File::open(file_path)?;
        let map = if file.metadata()?.len() == 0 {
            None
        } else {
            // Safety: the mapping is read-only and private to this page.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path,
            mime_type,
            map,
        })
    }
}

impl Page for MappedPage {
    fn path(&self) -> &str {
        &self.path
    }

    fn mime_type(&self) -> &str {
        self.mime_type
    }

    fn content(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

/// A page materialized from a store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub(crate) path: String,
    pub(crate) mime_type: String,
    pub(crate) content: Vec<u8>,
}

impl StoredPage {
    /// Consume the page, yielding its content without copying.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

impl Page for StoredPage {
    fn path(&self) -> &str {
        &self.path
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Join path components with forward slashes regardless of platform.
fn url_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn mapped_page_derives_path_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/app.json"), b"{}").unwrap();

        let page = MappedPage::open(dir.path(), &dir.path().join("assets/app.json")).unwrap();
        assert_eq!(page.path(), "/assets/app.json");
        assert_eq!(page.mime_type(), "application/json");
        assert_eq!(page.content(), b"{}");
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn mapped_page_handles_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), b"").unwrap();

        let page = MappedPage::open(dir.path(), &dir.path().join("empty.txt")).unwrap();
        assert_eq!(page.path(), "/empty.txt");
        assert!(page.is_empty());
        assert_eq!(page.content(), b"");
    }

    #[test]
    fn mapped_page_rejects_file_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        fs::write(other.path().join("stray.txt"), b"x").unwrap();

        let result = MappedPage::open(dir.path(), &other.path().join("stray.txt"));
        assert!(result.is_err());
    }
}
