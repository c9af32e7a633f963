//! Tree-level diff: compare two snapshots and produce a list of changes.
//!
//! Both trees hold entries sorted by name, so comparison is a merge of two
//! sorted sequences. When a directory entry appears on both sides with the
//! same digest, the whole sub-tree is skipped unloaded; mismatched
//! directories are recursed into, and one-sided directories are expanded so
//! that every change is reported at leaf granularity with its full path.

use mgit_commit::Commit;
use mgit_store::ObjectStore;
use mgit_tree::{Entry, EntryMode, Tree};
use mgit_types::Digest;

use crate::error::DiffResult;

/// The result of comparing two snapshots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeDiff {
    /// Changes in depth-first path order.
    pub changes: Vec<TreeChange>,
}

impl TreeDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the snapshots are identical.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// A single change between two snapshots.
///
/// Paths are repository-relative, `/`-separated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeChange {
    /// A new leaf was added.
    Added {
        path: String,
        new_digest: Digest,
        mode: EntryMode,
    },
    /// An existing leaf was removed.
    Removed {
        path: String,
        old_digest: Digest,
        mode: EntryMode,
    },
    /// A leaf's content or mode changed at the same path.
    Modified {
        path: String,
        old_digest: Digest,
        new_digest: Digest,
        old_mode: EntryMode,
        new_mode: EntryMode,
    },
    /// An entry flipped between directory and non-directory.
    TypeChanged {
        path: String,
        old_digest: Digest,
        new_digest: Digest,
        old_mode: EntryMode,
        new_mode: EntryMode,
    },
}

impl TreeChange {
    /// The repository-relative path this change is about.
    pub fn path(&self) -> &str {
        match self {
            TreeChange::Added { path, .. }
            | TreeChange::Removed { path, .. }
            | TreeChange::Modified { path, .. }
            | TreeChange::TypeChanged { path, .. } => path,
        }
    }
}

/// Compare two trees. `None` stands for the empty tree, so a diff against
/// `None` reports every leaf on the other side.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old: Option<&Tree>,
    new: Option<&Tree>,
) -> DiffResult<TreeDiff> {
    let mut diff = TreeDiff::new();
    diff_into(store, "", old, new, &mut diff.changes)?;
    Ok(diff)
}

/// Compare the snapshots of two commits.
///
/// `old` defaults to the empty tree, which makes the diff of a root commit
/// an all-additions listing.
pub fn diff_commits(
    store: &dyn ObjectStore,
    old: Option<&Digest>,
    new: &Digest,
) -> DiffResult<TreeDiff> {
    let old_tree = match old {
        Some(digest) => Some(load_commit_tree(store, digest)?),
        None => None,
    };
    let new_tree = load_commit_tree(store, new)?;
    diff_trees(store, old_tree.as_ref(), Some(&new_tree))
}

fn load_commit_tree(store: &dyn ObjectStore, digest: &Digest) -> DiffResult<Tree> {
    let commit = Commit::from_object(&store.get(digest)?)?;
    load_tree(store, &commit.tree)
}

fn load_tree(store: &dyn ObjectStore, digest: &Digest) -> DiffResult<Tree> {
    Ok(Tree::from_object(&store.get(digest)?)?)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

fn diff_into(
    store: &dyn ObjectStore,
    prefix: &str,
    old: Option<&Tree>,
    new: Option<&Tree>,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    let old_entries = old.map(Tree::entries).unwrap_or(&[]);
    let new_entries = new.map(Tree::entries).unwrap_or(&[]);

    let (mut i, mut j) = (0, 0);
    while i < old_entries.len() || j < new_entries.len() {
        match (old_entries.get(i), new_entries.get(j)) {
            (Some(old_entry), Some(new_entry)) => {
                match old_entry.name.as_bytes().cmp(new_entry.name.as_bytes()) {
                    std::cmp::Ordering::Less => {
                        emit_removed(store, prefix, old_entry, out)?;
                        i += 1;
                    }
                    std::cmp::Ordering::Greater => {
                        emit_added(store, prefix, new_entry, out)?;
                        j += 1;
                    }
                    std::cmp::Ordering::Equal => {
                        emit_pair(store, prefix, old_entry, new_entry, out)?;
                        i += 1;
                        j += 1;
                    }
                }
            }
            (Some(old_entry), None) => {
                emit_removed(store, prefix, old_entry, out)?;
                i += 1;
            }
            (None, Some(new_entry)) => {
                emit_added(store, prefix, new_entry, out)?;
                j += 1;
            }
            (None, None) => unreachable!("loop condition"),
        }
    }
    Ok(())
}

fn emit_pair(
    store: &dyn ObjectStore,
    prefix: &str,
    old_entry: &Entry,
    new_entry: &Entry,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    // Equal digest and mode: identical sub-tree or leaf, skip unloaded.
    if old_entry.digest == new_entry.digest && old_entry.mode == new_entry.mode {
        return Ok(());
    }

    let path = join(prefix, &new_entry.name);
    match (old_entry.mode.is_tree(), new_entry.mode.is_tree()) {
        (true, true) => {
            let old_sub = load_tree(store, &old_entry.digest)?;
            let new_sub = load_tree(store, &new_entry.digest)?;
            diff_into(store, &path, Some(&old_sub), Some(&new_sub), out)
        }
        (false, false) => {
            out.push(TreeChange::Modified {
                path,
                old_digest: old_entry.digest,
                new_digest: new_entry.digest,
                old_mode: old_entry.mode,
                new_mode: new_entry.mode,
            });
            Ok(())
        }
        _ => {
            out.push(TreeChange::TypeChanged {
                path,
                old_digest: old_entry.digest,
                new_digest: new_entry.digest,
                old_mode: old_entry.mode,
                new_mode: new_entry.mode,
            });
            Ok(())
        }
    }
}

fn emit_removed(
    store: &dyn ObjectStore,
    prefix: &str,
    entry: &Entry,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    let path = join(prefix, &entry.name);
    if entry.mode.is_tree() {
        let subtree = load_tree(store, &entry.digest)?;
        diff_into(store, &path, Some(&subtree), None, out)
    } else {
        out.push(TreeChange::Removed {
            path,
            old_digest: entry.digest,
            mode: entry.mode,
        });
        Ok(())
    }
}

fn emit_added(
    store: &dyn ObjectStore,
    prefix: &str,
    entry: &Entry,
    out: &mut Vec<TreeChange>,
) -> DiffResult<()> {
    let path = join(prefix, &entry.name);
    if entry.mode.is_tree() {
        let subtree = load_tree(store, &entry.digest)?;
        diff_into(store, &path, None, Some(&subtree), out)
    } else {
        out.push(TreeChange::Added {
            path,
            new_digest: entry.digest,
            mode: entry.mode,
        });
        Ok(())
    }
}
