//! Content-addressed object storage for mgit.
//!
//! Objects are typed byte payloads (blob, tree, commit) identified by the
//! SHA-1 digest of their canonical encoding. The store is a pure key-value
//! store: it never interprets object contents beyond the header.
//!
//! # Key Types
//!
//! - [`Object`] / [`ObjectKind`] -- typed payload and its canonical encoding
//! - [`ObjectStore`] -- storage trait (idempotent writes, typed errors)
//! - [`FsObjectStore`] -- zlib-compressed one-file-per-digest backend
//! - [`InMemoryObjectStore`] -- HashMap backend for tests and embedding

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Object, ObjectKind};
pub use traits::{ObjectStore, Put};
