use mgit_store::ObjectStore;
use mgit_types::Digest;

use crate::commit::Commit;
use crate::error::CommitResult;

/// Iterator over a commit's ancestry, newest first.
///
/// Yields `(digest, commit)` pairs starting from the given head and
/// following parent links until a root commit. Stops after the first error
/// (a dangling parent or a corrupt commit payload).
pub struct History<'a> {
    store: &'a dyn ObjectStore,
    next: Option<Digest>,
}

impl<'a> History<'a> {
    pub fn new(store: &'a dyn ObjectStore, head: Digest) -> Self {
        Self {
            store,
            next: Some(head),
        }
    }

    fn load(&self, digest: Digest) -> CommitResult<(Digest, Commit)> {
        let object = self.store.get(&digest)?;
        let commit = Commit::from_object(&object)?;
        Ok((digest, commit))
    }
}

impl Iterator for History<'_> {
    type Item = CommitResult<(Digest, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let digest = self.next.take()?;
        match self.load(digest) {
            Ok((digest, commit)) => {
                self.next = commit.parent;
                Some(Ok((digest, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::commit_tree;
    use crate::error::CommitError;
    use mgit_store::{InMemoryObjectStore, Object};
    use mgit_tree::Tree;

    fn chain(store: &InMemoryObjectStore, len: usize) -> Vec<Digest> {
        let tree = store.put(&Tree::new().to_object()).unwrap().digest();
        let mut digests = Vec::new();
        let mut parent = None;
        for i in 0..len {
            let digest =
                commit_tree(store, tree, parent, "alice", Some(&format!("commit {i}"))).unwrap();
            digests.push(digest);
            parent = Some(digest);
        }
        digests
    }

    #[test]
    fn walks_from_head_to_root() {
        let store = InMemoryObjectStore::new();
        let digests = chain(&store, 3);

        let walked: Vec<_> = History::new(&store, digests[2])
            .collect::<CommitResult<Vec<_>>>()
            .unwrap();

        assert_eq!(walked.len(), 3);
        // Newest first.
        assert_eq!(walked[0].0, digests[2]);
        assert_eq!(walked[2].0, digests[0]);
        assert_eq!(walked[0].1.message.as_deref(), Some("commit 2"));
        assert_eq!(walked[2].1.parent, None);
    }

    #[test]
    fn single_commit_history() {
        let store = InMemoryObjectStore::new();
        let digests = chain(&store, 1);

        let walked: Vec<_> = History::new(&store, digests[0]).collect();
        assert_eq!(walked.len(), 1);
    }

    #[test]
    fn dangling_head_yields_one_error() {
        let store = InMemoryObjectStore::new();
        let mut history = History::new(&store, Digest::hash(b"nowhere"));

        assert!(matches!(history.next(), Some(Err(CommitError::Store(_)))));
        assert!(history.next().is_none());
    }

    #[test]
    fn non_commit_head_yields_wrong_object_type() {
        let store = InMemoryObjectStore::new();
        let blob = store.put(&Object::blob(b"x".to_vec())).unwrap().digest();
        let mut history = History::new(&store, blob);

        assert!(matches!(
            history.next(),
            Some(Err(CommitError::WrongObjectType { .. }))
        ));
        assert!(history.next().is_none());
    }
}
