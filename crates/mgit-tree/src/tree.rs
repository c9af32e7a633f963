//! Sorted tree container and its canonical wire form.
//!
//! Serialized trees are a concatenation of records, one per entry, in
//! byte-wise name order:
//!
//! ```text
//! "{mode-octal} {name}\0" + digest (20 raw bytes)
//! ```
//!
//! Record length is variable, so parsing walks the payload record by record;
//! there is no count prefix and no padding.

use mgit_store::{Object, ObjectKind, ObjectStore};
use mgit_types::{Digest, DIGEST_LEN};

use crate::entry::{Entry, EntryMode};
use crate::error::{TreeError, TreeResult};

/// An ordered set of named entries. Sorted by name bytes at all times.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    entries: Vec<Entry>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|e| e.name.as_bytes().cmp(name.as_bytes()))
    }

    /// Look up an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.position(name).ok().map(|i| &self.entries[i])
    }

    /// Insert an entry, or replace the entry with the same name.
    ///
    /// Returns the replaced entry, if any. The sort order is preserved.
    pub fn upsert(&mut self, entry: Entry) -> Option<Entry> {
        match self.position(&entry.name) {
            Ok(i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            Err(i) => {
                self.entries.insert(i, entry);
                None
            }
        }
    }

    /// Remove an entry by exact name. Returns the removed entry, if any.
    pub fn remove_entry(&mut self, name: &str) -> Option<Entry> {
        match self.position(name) {
            Ok(i) => Some(self.entries.remove(i)),
            Err(_) => None,
        }
    }

    /// Remove an entry, optionally deleting its backing object from the
    /// store as well.
    ///
    /// Deleting the object is only safe when nothing else references it;
    /// callers that share blobs across trees should pass `false`.
    pub fn remove(
        &mut self,
        store: &dyn ObjectStore,
        name: &str,
        also_delete_object: bool,
    ) -> TreeResult<Option<Entry>> {
        match self.remove_entry(name) {
            Some(entry) => {
                if also_delete_object {
                    store.delete(&entry.digest)?;
                }
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    /// Canonical serialization: records in name order, each
    /// `"{mode-octal} {name}\0"` followed by the raw 20-byte digest.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(format!("{:o} {}\0", entry.mode.mode_bits(), entry.name).as_bytes());
            out.extend_from_slice(entry.digest.as_bytes());
        }
        out
    }

    /// Wrap the canonical serialization in a tree object.
    pub fn to_object(&self) -> Object {
        Object::new(ObjectKind::Tree, self.serialize())
    }

    /// Digest of the canonical serialization (the tree's identity).
    pub fn digest(&self) -> Digest {
        self.to_object().digest()
    }

    /// Parse a serialized tree payload.
    ///
    /// Rejects unknown modes, empty names, truncated digests, and records
    /// out of name order.
    pub fn deserialize(bytes: &[u8]) -> TreeResult<Self> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let nul = bytes[pos..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| TreeError::InvalidTree("record missing NUL terminator".into()))?;
            let header = std::str::from_utf8(&bytes[pos..pos + nul])
                .map_err(|_| TreeError::InvalidTree("record header is not UTF-8".into()))?;
            let (mode_str, name) = header
                .split_once(' ')
                .ok_or_else(|| TreeError::InvalidTree("record header missing space".into()))?;

            let bits = u32::from_str_radix(mode_str, 8)
                .map_err(|_| TreeError::InvalidTree(format!("bad mode field {mode_str:?}")))?;
            let mode = EntryMode::from_mode_bits(bits)?;

            if name.is_empty() {
                return Err(TreeError::InvalidTree("entry name is empty".into()));
            }
            if name.contains('/') {
                return Err(TreeError::InvalidTree(format!(
                    "entry name {name:?} contains a path separator"
                )));
            }

            pos += nul + 1;
            if bytes.len() - pos < DIGEST_LEN {
                return Err(TreeError::InvalidTree(format!(
                    "truncated digest for entry {name:?}"
                )));
            }
            let digest = Digest::from_slice(&bytes[pos..pos + DIGEST_LEN])
                .map_err(|e| TreeError::InvalidTree(e.to_string()))?;
            pos += DIGEST_LEN;

            if let Some(prev) = entries.last() {
                if prev.name.as_bytes() >= name.as_bytes() {
                    return Err(TreeError::InvalidTree(format!(
                        "entries out of order: {:?} before {name:?}",
                        prev.name
                    )));
                }
            }
            entries.push(Entry::new(mode, name, digest));
        }

        Ok(Self { entries })
    }

    /// Parse a tree object, checking its kind first.
    pub fn from_object(object: &Object) -> TreeResult<Self> {
        if object.kind != ObjectKind::Tree {
            return Err(TreeError::InvalidTree(format!(
                "expected a tree object, got {}",
                object.kind
            )));
        }
        Self::deserialize(&object.content)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blob_digest(content: &[u8]) -> Digest {
        Object::blob(content.to_vec()).digest()
    }

    // --- Ordering and lookup ---

    #[test]
    fn upsert_keeps_entries_sorted_by_name_bytes() {
        let mut tree = Tree::new();
        for name in ["zebra", "apple", "mango"] {
            tree.upsert(Entry::new(EntryMode::Regular, name, blob_digest(name.as_bytes())));
        }
        let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["apple", "mango", "zebra"]);
    }

    #[test]
    fn upsert_same_name_replaces() {
        let mut tree = Tree::new();
        tree.upsert(Entry::new(EntryMode::Regular, "file", blob_digest(b"v1")));
        let replaced = tree.upsert(Entry::new(EntryMode::Executable, "file", blob_digest(b"v2")));

        assert_eq!(replaced.unwrap().digest, blob_digest(b"v1"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.find("file").unwrap().mode, EntryMode::Executable);
    }

    #[test]
    fn find_is_exact_name_match() {
        let mut tree = Tree::new();
        tree.upsert(Entry::new(EntryMode::Regular, "readme", blob_digest(b"x")));

        assert!(tree.find("readme").is_some());
        assert!(tree.find("read").is_none());
        assert!(tree.find("readme.md").is_none());
    }

    #[test]
    fn remove_entry_by_name() {
        let mut tree = Tree::new();
        tree.upsert(Entry::new(EntryMode::Regular, "a", blob_digest(b"a")));
        tree.upsert(Entry::new(EntryMode::Regular, "b", blob_digest(b"b")));

        assert_eq!(tree.remove_entry("a").unwrap().name, "a");
        assert!(tree.remove_entry("a").is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn remove_can_delete_backing_object() {
        let store = mgit_store::InMemoryObjectStore::new();
        let digest = store.put(&Object::blob(b"doomed".to_vec())).unwrap().digest();
        let mut tree = Tree::new();
        tree.upsert(Entry::new(EntryMode::Regular, "doomed", digest));

        tree.remove(&store, "doomed", true).unwrap();
        assert!(!store.contains(&digest).unwrap());

        // Without the flag the object survives.
        let kept = store.put(&Object::blob(b"kept".to_vec())).unwrap().digest();
        tree.upsert(Entry::new(EntryMode::Regular, "kept", kept));
        tree.remove(&store, "kept", false).unwrap();
        assert!(store.contains(&kept).unwrap());
    }

    // --- Serialization ---

    #[test]
    fn serialize_record_layout() {
        let mut tree = Tree::new();
        let digest = blob_digest(b"content");
        tree.upsert(Entry::new(EntryMode::Regular, "file.txt", digest));

        let bytes = tree.serialize();
        let mut expected = b"100644 file.txt\0".to_vec();
        expected.extend_from_slice(digest.as_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn serialize_deserialize_roundtrip() {
        let mut tree = Tree::new();
        tree.upsert(Entry::new(EntryMode::Regular, "readme", blob_digest(b"r")));
        tree.upsert(Entry::new(EntryMode::Directory, "src", blob_digest(b"s")));
        tree.upsert(Entry::new(EntryMode::Executable, "run.sh", blob_digest(b"x")));

        let parsed = Tree::deserialize(&tree.serialize()).unwrap();
        assert_eq!(parsed, tree);
    }

    #[test]
    fn empty_tree_serializes_to_empty_payload() {
        let tree = Tree::new();
        assert!(tree.serialize().is_empty());
        assert_eq!(Tree::deserialize(&[]).unwrap(), tree);
    }

    #[test]
    fn deserialize_rejects_truncated_digest() {
        let mut tree = Tree::new();
        tree.upsert(Entry::new(EntryMode::Regular, "file", blob_digest(b"f")));
        let bytes = tree.serialize();

        let err = Tree::deserialize(&bytes[..bytes.len() - 5]).unwrap_err();
        assert!(matches!(err, TreeError::InvalidTree(_)));
    }

    #[test]
    fn deserialize_rejects_unknown_mode() {
        let mut bytes = b"100600 file\0".to_vec();
        bytes.extend_from_slice(blob_digest(b"f").as_bytes());
        assert!(matches!(
            Tree::deserialize(&bytes).unwrap_err(),
            TreeError::InvalidTree(_)
        ));
    }

    #[test]
    fn deserialize_rejects_unsorted_records() {
        let mut tree_b = Tree::new();
        tree_b.upsert(Entry::new(EntryMode::Regular, "b", blob_digest(b"b")));
        let mut tree_a = Tree::new();
        tree_a.upsert(Entry::new(EntryMode::Regular, "a", blob_digest(b"a")));

        let mut bytes = tree_b.serialize();
        bytes.extend_from_slice(&tree_a.serialize());
        assert!(matches!(
            Tree::deserialize(&bytes).unwrap_err(),
            TreeError::InvalidTree(_)
        ));
    }

    #[test]
    fn from_object_rejects_non_tree_kind() {
        let blob = Object::blob(b"not a tree".to_vec());
        assert!(matches!(
            Tree::from_object(&blob).unwrap_err(),
            TreeError::InvalidTree(_)
        ));
    }

    // --- Canonical hashing ---

    proptest! {
        #[test]
        fn digest_is_insertion_order_independent(
            names in proptest::collection::hash_set("[a-z][a-z0-9]{0,7}", 1..8)
        ) {
            let names: Vec<String> = names.into_iter().collect();

            let mut sorted = names.clone();
            sorted.sort();

            let mut tree_a = Tree::new();
            for name in &sorted {
                tree_a.upsert(Entry::new(EntryMode::Regular, name, blob_digest(name.as_bytes())));
            }
            let mut tree_b = Tree::new();
            for name in names.iter().rev() {
                tree_b.upsert(Entry::new(EntryMode::Regular, name, blob_digest(name.as_bytes())));
            }

            prop_assert_eq!(tree_a.serialize(), tree_b.serialize());
            prop_assert_eq!(tree_a.digest(), tree_b.digest());
        }
    }
}
