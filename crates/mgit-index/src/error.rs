/// Errors from staging index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The repository metadata directory is missing.
    #[error("repository is not initialized")]
    RepoNotInitialized,

    /// No staged entry at this path.
    #[error("no staged entry at {0:?}")]
    EntryNotFound(String),

    /// The on-disk index file cannot be parsed.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// A tree operation failed while folding or flattening.
    #[error(transparent)]
    Tree(#[from] mgit_tree::TreeError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] mgit_store::StoreError),

    /// I/O error while touching the index file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for staging index operations.
pub type IndexResult<T> = Result<T, IndexError>;
