//! Branch references and HEAD management for mgit.
//!
//! A branch is a named, mutable pointer to a commit digest; HEAD is a
//! symbolic pointer to the current branch. A branch that exists but has no
//! commit yet (a fresh repository, or a branch created before the first
//! commit) is *unborn* and reads as `None`.
//!
//! # Key Types
//!
//! - [`RefStore`] -- storage trait for branches and HEAD
//! - [`FsRefStore`] -- one-file-per-branch backend under `refs/heads/`
//! - [`InMemoryRefStore`] -- HashMap backend for tests and embedding

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;

pub use error::{RefError, RefResult};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::validate_branch_name;
pub use traits::RefStore;

/// Branch a fresh repository starts on.
pub const DEFAULT_BRANCH: &str = "main";
