//! Staging index for mgit.
//!
//! The [`Index`] is a flat, path-keyed set of the entries staged for the
//! next commit. Staging a path records its blob digest and mode;
//! committing folds the staged entries into the parent snapshot's tree
//! and then clears the index, so between commits it holds only what has
//! been staged since.

pub mod entry;
pub mod error;
pub mod index;

pub use entry::IndexEntry;
pub use error::{IndexError, IndexResult};
pub use index::Index;
