//! Diff engine for mgit.
//!
//! Tree diffs walk two snapshots side by side, exploiting the sorted-entry
//! invariant: entries are merged by name in a single pass, and sub-trees
//! with equal digests are skipped without loading them. Blob diffs are
//! line-oriented Myers diffs with context, produced through the
//! [`LeafDiffer`] seam so callers can swap the leaf-level strategy.
//!
//! # Key Types
//!
//! - [`TreeDiff`] / [`TreeChange`] -- structural changes between snapshots
//! - [`diff_trees`] / [`diff_commits`] -- entry points
//! - [`LeafDiffer`] / [`TextDiffer`] -- line-level content diffs

pub mod blob_diff;
pub mod error;
pub mod tree_diff;

pub use blob_diff::{diff_blobs, BlobDiff, DiffHunk, DiffLine, LeafDiffer, TextDiffer};
pub use error::{DiffError, DiffResult};
pub use tree_diff::{diff_commits, diff_trees, TreeChange, TreeDiff};
