//! Commit model for mgit.
//!
//! A [`Commit`] binds a tree snapshot to its metadata (parent, author,
//! optional message) and is itself a stored object, so a commit's digest
//! covers the entire reachable snapshot plus the history behind it.
//!
//! # Key Types
//!
//! - [`Commit`] -- snapshot metadata with text serialization
//! - [`History`] -- iterator walking the parent chain, newest first
//! - [`commit_tree`] -- validated write path for new commits
//! - [`create_commit`] -- fold the staging index into the parent snapshot
//!   and store the resulting commit

pub mod commit;
pub mod error;
pub mod history;
pub mod snapshot;

pub use commit::{commit_tree, Commit};
pub use error::{CommitError, CommitResult};
pub use history::History;
pub use snapshot::{create_commit, snapshot};
