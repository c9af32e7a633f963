//! Building the next snapshot from a parent commit and the staging index.

use mgit_index::Index;
use mgit_store::ObjectStore;
use mgit_tree::Tree;
use mgit_types::Digest;
use tracing::debug;

use crate::commit::{commit_tree, Commit};
use crate::error::CommitResult;

/// Build the prospective next snapshot: the parent commit's tree with
/// every staged entry folded in.
///
/// Paths the index does not mention are carried over from the parent
/// unchanged, so committed files survive without re-staging. Intermediate
/// tree objects are written to the store; the returned root is not.
pub fn snapshot(
    store: &dyn ObjectStore,
    index: &Index,
    parent: Option<&Digest>,
) -> CommitResult<Tree> {
    let mut tree = match parent {
        Some(digest) => {
            let commit = Commit::from_object(&store.get(digest)?)?;
            Tree::from_object(&store.get(&commit.tree)?)?
        }
        None => Tree::new(),
    };
    index.fold_into(store, &mut tree)?;
    Ok(tree)
}

/// Store a new commit built from the staging index.
///
/// Writes the root tree and the commit object. Updating the branch ref is
/// the caller's final step, once both objects are durable.
pub fn create_commit(
    store: &dyn ObjectStore,
    index: &Index,
    parent: Option<Digest>,
    author: &str,
    message: Option<&str>,
) -> CommitResult<Digest> {
    let tree = snapshot(store, index, parent.as_ref())?;
    let tree_digest = store.put(&tree.to_object())?.digest();
    debug!(tree = %tree_digest, staged = index.len(), "snapshot tree stored");
    commit_tree(store, tree_digest, parent, author, message)
}
