//! The [`RefStore`] trait defining the reference storage interface.

use mgit_types::Digest;

use crate::error::RefResult;

/// Storage backend for branches and HEAD.
///
/// Implementations must be thread-safe (`Send + Sync`). Branch names are
/// short names (`main`, `feature/auth`), not full ref paths; backends decide
/// how to lay them out.
pub trait RefStore: Send + Sync {
    /// Name of the branch HEAD points at.
    fn current_branch(&self) -> RefResult<String>;

    /// Commit digest of the current branch.
    ///
    /// `Ok(None)` means the branch is unborn (no commit yet).
    fn head_digest(&self) -> RefResult<Option<Digest>> {
        self.read_branch(&self.current_branch()?)
    }

    /// Returns `true` if a branch with this name exists.
    fn branch_exists(&self, name: &str) -> RefResult<bool>;

    /// Commit digest a branch points at, or `Ok(None)` for an unborn branch.
    ///
    /// Fails with `BranchNotFound` if no such branch exists.
    fn read_branch(&self, name: &str) -> RefResult<Option<Digest>>;

    /// Point an existing branch at a commit.
    ///
    /// Fails with `BranchNotFound` if no such branch exists.
    fn update_branch(&self, name: &str, digest: Digest) -> RefResult<()>;

    /// Point the current branch at a commit.
    fn update_head(&self, digest: Digest) -> RefResult<()> {
        self.update_branch(&self.current_branch()?, digest)
    }

    /// Create a branch pointing at `target` (`None` for an unborn branch).
    ///
    /// Fails with `BranchAlreadyExists` if the name is taken.
    fn create_branch(&self, name: &str, target: Option<Digest>) -> RefResult<()>;

    /// Delete a branch.
    ///
    /// Returns `Ok(true)` if the branch existed, `Ok(false)` if not. Fails
    /// with `DeleteCurrentBranch` if HEAD points at it.
    fn delete_branch(&self, name: &str) -> RefResult<bool>;

    /// Point HEAD at an existing branch.
    ///
    /// Fails with `BranchNotFound` if no such branch exists.
    fn set_head(&self, branch: &str) -> RefResult<()>;

    /// All branches with their targets, sorted by name.
    fn list_branches(&self) -> RefResult<Vec<(String, Option<Digest>)>>;
}
