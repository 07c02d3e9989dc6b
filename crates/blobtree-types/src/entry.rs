use serde::{Deserialize, Serialize};

/// One row of a directory listing: `(path, is_dir, size)`.
///
/// `size` is `None` for directories and the stored byte length for files.
/// Ordering is by path first, so a sorted listing is sorted by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryInfo {
    pub path: String,
    pub is_dir: bool,
    pub size: Option<u64>,
}

impl EntryInfo {
    /// A file entry with its byte length.
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            size: Some(size),
        }
    }

    /// A directory entry.
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            size: None,
        }
    }
}

impl From<EntryInfo> for (String, bool, Option<u64>) {
    fn from(entry: EntryInfo) -> Self {
        (entry.path, entry.is_dir, entry.size)
    }
}
