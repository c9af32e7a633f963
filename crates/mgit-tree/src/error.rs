/// Errors from tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The tree payload or a requested mutation violates the tree model:
    /// unparseable serialization, an empty or malformed path, a mode
    /// conflict, or an over-deep path.
    #[error("invalid tree: {0}")]
    InvalidTree(String),

    /// Store operation failed while resolving or persisting a sub-tree.
    #[error(transparent)]
    Store(#[from] mgit_store::StoreError),
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
