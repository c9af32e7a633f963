//! Tree model for mgit.
//!
//! A [`Tree`] is an ordered set of named entries pointing at blobs or
//! sub-trees. Entries are kept sorted by byte-wise name order at all times,
//! which makes serialization canonical: two trees holding the same entries
//! always produce the same bytes and therefore the same digest.
//!
//! The [`builder`] module folds flat repository-relative paths into nested
//! trees, re-hashing and re-storing every ancestor on the mutated path
//! (a bottom-up Merkle rebuild).

pub mod builder;
pub mod entry;
pub mod error;
pub mod tree;

pub use builder::{insert_path, link_path, validate_path, MAX_PATH_DEPTH};
pub use entry::{Entry, EntryMode};
pub use error::{TreeError, TreeResult};
pub use tree::Tree;
