/// Errors from reference operations.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    /// The branch name violates the naming rules.
    #[error("invalid branch name {name:?}: {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// A branch with this name already exists.
    #[error("branch {0:?} already exists")]
    BranchAlreadyExists(String),

    /// No branch with this name exists.
    #[error("branch {0:?} not found")]
    BranchNotFound(String),

    /// The branch HEAD points at cannot be deleted.
    #[error("cannot delete the current branch {0:?}")]
    DeleteCurrentBranch(String),

    /// A ref file holds something other than a digest or a branch pointer.
    #[error("corrupt ref {name:?}: {reason}")]
    CorruptRef { name: String, reason: String },

    /// The repository metadata directory is missing.
    #[error("repository is not initialized")]
    RepoNotInitialized,

    /// I/O error while touching ref files.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for reference operations.
pub type RefResult<T> = Result<T, RefError>;
