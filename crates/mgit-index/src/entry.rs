use mgit_tree::EntryMode;
use mgit_types::Digest;

/// A single staged path: repository-relative path, mode, and blob digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub path: String,
    pub mode: EntryMode,
    pub digest: Digest,
}

impl IndexEntry {
    pub fn new(path: impl Into<String>, mode: EntryMode, digest: Digest) -> Self {
        Self {
            path: path.into(),
            mode,
            digest,
        }
    }
}
