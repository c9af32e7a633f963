/// Errors from diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A sub-tree failed to load or parse.
    #[error(transparent)]
    Tree(#[from] mgit_tree::TreeError),

    /// A commit failed to load or parse while diffing snapshots.
    #[error(transparent)]
    Commit(#[from] mgit_commit::CommitError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] mgit_store::StoreError),
}

/// Result alias for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;
