//! Merkle path folding: inserting a flat path into a nested tree.
//!
//! `insert_path` walks a `/`-separated path one component at a time,
//! loading or creating the sub-tree for each directory component, placing
//! the leaf at the bottom, then re-serializing and re-storing every tree on
//! the way back up. Only trees on the mutated path get new digests; sibling
//! sub-trees keep their stored objects untouched.

use mgit_store::{Object, ObjectStore};
use mgit_types::Digest;

use crate::entry::{Entry, EntryMode};
use crate::error::{TreeError, TreeResult};
use crate::tree::Tree;

/// Maximum number of path components a single insertion may traverse.
pub const MAX_PATH_DEPTH: usize = 128;

/// Validate a repository-relative path: non-empty, no leading, trailing,
/// or doubled separators.
pub fn validate_path(path: &str) -> TreeResult<()> {
    if path.is_empty() {
        return Err(TreeError::InvalidTree("path is empty".into()));
    }
    if path.split('/').any(str::is_empty) {
        return Err(TreeError::InvalidTree(format!(
            "path {path:?} has an empty component"
        )));
    }
    if path.split('/').count() > MAX_PATH_DEPTH {
        return Err(TreeError::InvalidTree(format!(
            "path {path:?} exceeds maximum depth {MAX_PATH_DEPTH}"
        )));
    }
    Ok(())
}

/// Store `source` as a blob and link it into `tree` at `path`, creating
/// intermediate directory trees as needed.
///
/// Every tree along the mutated path is re-stored; the caller is left with
/// the updated root in `tree` and must persist it (or hand it to the commit
/// layer) to anchor the new digests.
///
/// Fails with `InvalidTree` if a path component is already taken by a
/// non-directory entry.
pub fn insert_path(
    store: &dyn ObjectStore,
    tree: &mut Tree,
    path: &str,
    mode: EntryMode,
    source: &Object,
) -> TreeResult<()> {
    validate_path(path)?;
    check_leaf_mode(path, mode)?;
    let digest = store.put(source)?.digest();
    link_components(store, tree, path, mode, digest)
}

/// Like [`insert_path`], but links a blob that is already in the store.
pub fn link_path(
    store: &dyn ObjectStore,
    tree: &mut Tree,
    path: &str,
    mode: EntryMode,
    digest: Digest,
) -> TreeResult<()> {
    validate_path(path)?;
    check_leaf_mode(path, mode)?;
    link_components(store, tree, path, mode, digest)
}

fn check_leaf_mode(path: &str, mode: EntryMode) -> TreeResult<()> {
    if mode.is_tree() {
        return Err(TreeError::InvalidTree(format!(
            "cannot insert {path:?} with a directory mode"
        )));
    }
    Ok(())
}

fn link_components(
    store: &dyn ObjectStore,
    tree: &mut Tree,
    path: &str,
    mode: EntryMode,
    digest: Digest,
) -> TreeResult<()> {
    match path.split_once('/') {
        None => {
            tree.upsert(Entry::new(mode, path, digest));
            Ok(())
        }
        Some((dir, rest)) => {
            let mut subtree = match tree.find(dir) {
                Some(entry) if entry.mode.is_tree() => {
                    let object = store.get(&entry.digest)?;
                    Tree::from_object(&object)?
                }
                Some(entry) => {
                    return Err(TreeError::InvalidTree(format!(
                        "path component {:?} is a {} entry, not a directory",
                        dir, entry.mode
                    )));
                }
                None => Tree::new(),
            };

            link_components(store, &mut subtree, rest, mode, digest)?;

            let subtree_digest = store.put(&subtree.to_object())?.digest();
            tree.upsert(Entry::new(EntryMode::Directory, dir, subtree_digest));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgit_store::InMemoryObjectStore;

    fn insert(store: &InMemoryObjectStore, tree: &mut Tree, path: &str, content: &[u8]) {
        insert_path(
            store,
            tree,
            path,
            EntryMode::Regular,
            &Object::blob(content.to_vec()),
        )
        .unwrap();
    }

    /// Resolve a nested path through the store for assertions.
    fn resolve<'a>(store: &InMemoryObjectStore, tree: &Tree, path: &'a str) -> Option<Entry> {
        let mut current = tree.clone();
        let mut components = path.split('/').peekable();
        while let Some(component) = components.next() {
            let entry = current.find(component)?.clone();
            if components.peek().is_none() {
                return Some(entry);
            }
            let object = store.get(&entry.digest).ok()?;
            current = Tree::from_object(&object).ok()?;
        }
        None
    }

    #[test]
    fn top_level_insert_stores_blob() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        insert(&store, &mut tree, "readme.md", b"hello");

        let entry = tree.find("readme.md").unwrap();
        assert_eq!(entry.mode, EntryMode::Regular);
        assert_eq!(store.get(&entry.digest).unwrap().content, b"hello");
    }

    #[test]
    fn nested_path_creates_intermediate_trees() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        insert(&store, &mut tree, "a/b/c.txt", b"deep");

        let a = tree.find("a").unwrap();
        assert_eq!(a.mode, EntryMode::Directory);

        let leaf = resolve(&store, &tree, "a/b/c.txt").unwrap();
        assert_eq!(store.get(&leaf.digest).unwrap().content, b"deep");
        // blob + tree "b" + tree "a"
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn sibling_subtrees_keep_their_digests() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        insert(&store, &mut tree, "docs/guide.md", b"guide");
        insert(&store, &mut tree, "src/main.rs", b"fn main() {}");
        let docs_before = tree.find("docs").unwrap().digest;

        insert(&store, &mut tree, "src/lib.rs", b"pub fn lib() {}");

        assert_eq!(tree.find("docs").unwrap().digest, docs_before);
        assert!(resolve(&store, &tree, "src/main.rs").is_some());
        assert!(resolve(&store, &tree, "src/lib.rs").is_some());
    }

    #[test]
    fn mutated_path_changes_every_ancestor_digest() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        insert(&store, &mut tree, "a/b/file", b"v1");
        let a_before = tree.find("a").unwrap().digest;
        let root_before = tree.digest();

        insert(&store, &mut tree, "a/b/file", b"v2");

        assert_ne!(tree.find("a").unwrap().digest, a_before);
        assert_ne!(tree.digest(), root_before);
    }

    #[test]
    fn reinserting_identical_content_is_a_fixed_point() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        insert(&store, &mut tree, "a/b/file", b"same");
        let before = tree.digest();

        insert(&store, &mut tree, "a/b/file", b"same");
        assert_eq!(tree.digest(), before);
    }

    #[test]
    fn link_path_reuses_a_stored_blob() {
        let store = InMemoryObjectStore::new();
        let digest = store
            .put(&Object::blob(b"already stored".to_vec()))
            .unwrap()
            .digest();

        let mut tree = Tree::new();
        link_path(&store, &mut tree, "dir/file", EntryMode::Regular, digest).unwrap();

        assert_eq!(resolve(&store, &tree, "dir/file").unwrap().digest, digest);
    }

    #[test]
    fn blob_in_directory_position_is_rejected() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        insert(&store, &mut tree, "config", b"i am a file");

        let err = insert_path(
            &store,
            &mut tree,
            "config/nested",
            EntryMode::Regular,
            &Object::blob(b"x".to_vec()),
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::InvalidTree(_)));
    }

    #[test]
    fn directory_mode_leaf_is_rejected() {
        let store = InMemoryObjectStore::new();
        let mut tree = Tree::new();
        let err = insert_path(
            &store,
            &mut tree,
            "dir",
            EntryMode::Directory,
            &Object::blob(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(err, TreeError::InvalidTree(_)));
    }

    #[test]
    fn malformed_paths_are_rejected() {
        for path in ["", "/abs", "trailing/", "a//b"] {
            assert!(validate_path(path).is_err(), "{path:?} should be invalid");
        }
        assert!(validate_path("a/b/c").is_ok());
    }

    #[test]
    fn over_deep_path_is_rejected() {
        let deep = vec!["d"; MAX_PATH_DEPTH + 1].join("/");
        assert!(matches!(
            validate_path(&deep).unwrap_err(),
            TreeError::InvalidTree(_)
        ));
    }
}
