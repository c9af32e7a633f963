//! Foundation types for mgit.
//!
//! This crate provides the content-addressed [`Digest`] used throughout the
//! storage engine. Every other mgit crate depends on `mgit-types`.

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_LEN};
pub use error::TypeError;
