use mgit_store::ObjectKind;

/// Errors from commit operations.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The commit payload or a field being written is malformed.
    #[error("invalid commit: {0}")]
    InvalidCommit(String),

    /// An object referenced during commit construction or history traversal
    /// has the wrong kind.
    #[error("wrong object type: expected {expected}, got {actual}")]
    WrongObjectType {
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] mgit_store::StoreError),

    /// Snapshot tree could not be read or built.
    #[error(transparent)]
    Tree(#[from] mgit_tree::TreeError),

    /// Staged entries could not be folded into the snapshot.
    #[error(transparent)]
    Index(#[from] mgit_index::IndexError),
}

/// Result alias for commit operations.
pub type CommitResult<T> = Result<T, CommitError>;
