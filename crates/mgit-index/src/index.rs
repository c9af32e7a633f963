//! The flat staging manifest and its on-disk form.
//!
//! The index file reuses the tree record layout, but with full
//! repository-relative paths in the name field:
//!
//! ```text
//! "{mode-octal} {path}\0" + digest (20 raw bytes)
//! ```
//!
//! Records are sorted by path. Repository initialization writes the file,
//! so a missing index file means the repository itself is missing; saving
//! an empty index still writes the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mgit_store::ObjectStore;
use mgit_tree::{link_path, validate_path, EntryMode, Tree};
use mgit_types::{Digest, DIGEST_LEN};
use tracing::debug;

use crate::entry::IndexEntry;
use crate::error::{IndexError, IndexResult};

const INDEX_FILE: &str = "index";

/// The staging index: the path-keyed set of entries staged for the next
/// commit. Cleared once that commit is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<String, IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a staged entry by exact path.
    pub fn get(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Staged entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Stage a path, replacing any previous entry at that path.
    pub fn stage(&mut self, path: &str, mode: EntryMode, digest: Digest) -> IndexResult<()> {
        validate_path(path)?;
        if mode.is_tree() {
            return Err(IndexError::CorruptIndex(format!(
                "cannot stage {path:?} with a directory mode"
            )));
        }
        self.entries
            .insert(path.to_string(), IndexEntry::new(path, mode, digest));
        Ok(())
    }

    /// Remove a staged path, returning its entry.
    pub fn unstage(&mut self, path: &str) -> IndexResult<IndexEntry> {
        self.entries
            .remove(path)
            .ok_or_else(|| IndexError::EntryNotFound(path.to_string()))
    }

    /// Drop every staged entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // --- Persistence ---

    fn file_path(root: &Path) -> PathBuf {
        root.join(INDEX_FILE)
    }

    /// Load the index from a repository directory.
    pub fn load(root: &Path) -> IndexResult<Self> {
        match std::fs::read(Self::file_path(root)) {
            Ok(bytes) => Self::deserialize(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(IndexError::RepoNotInitialized)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the index back to a repository directory.
    pub fn save(&self, root: &Path) -> IndexResult<()> {
        if !root.is_dir() {
            return Err(IndexError::RepoNotInitialized);
        }
        std::fs::write(Self::file_path(root), self.serialize())?;
        debug!(entries = self.len(), "index saved");
        Ok(())
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in self.entries.values() {
            out.extend_from_slice(
                format!("{:o} {}\0", entry.mode.mode_bits(), entry.path).as_bytes(),
            );
            out.extend_from_slice(entry.digest.as_bytes());
        }
        out
    }

    pub fn deserialize(bytes: &[u8]) -> IndexResult<Self> {
        let mut entries = BTreeMap::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let nul = bytes[pos..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| IndexError::CorruptIndex("record missing NUL terminator".into()))?;
            let header = std::str::from_utf8(&bytes[pos..pos + nul])
                .map_err(|_| IndexError::CorruptIndex("record header is not UTF-8".into()))?;
            let (mode_str, path) = header
                .split_once(' ')
                .ok_or_else(|| IndexError::CorruptIndex("record header missing space".into()))?;

            let bits = u32::from_str_radix(mode_str, 8)
                .map_err(|_| IndexError::CorruptIndex(format!("bad mode field {mode_str:?}")))?;
            let mode = EntryMode::from_mode_bits(bits)?;
            validate_path(path)?;

            pos += nul + 1;
            if bytes.len() - pos < DIGEST_LEN {
                return Err(IndexError::CorruptIndex(format!(
                    "truncated digest for {path:?}"
                )));
            }
            let digest = Digest::from_slice(&bytes[pos..pos + DIGEST_LEN])
                .map_err(|e| IndexError::CorruptIndex(e.to_string()))?;
            pos += DIGEST_LEN;

            if entries
                .insert(path.to_string(), IndexEntry::new(path, mode, digest))
                .is_some()
            {
                return Err(IndexError::CorruptIndex(format!(
                    "duplicate entry for {path:?}"
                )));
            }
        }

        Ok(Self { entries })
    }

    // --- Snapshot folding ---

    /// Fold the staged entries into a snapshot tree, storing intermediate
    /// trees. Paths already present in the tree are replaced.
    ///
    /// Blobs must already be in the store; only tree objects are written.
    pub fn fold_into(&self, store: &dyn ObjectStore, tree: &mut Tree) -> IndexResult<()> {
        for entry in self.entries.values() {
            link_path(store, tree, &entry.path, entry.mode, entry.digest)?;
        }
        Ok(())
    }
}
