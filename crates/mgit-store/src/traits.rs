use mgit_types::Digest;

use crate::error::StoreResult;
use crate::object::Object;

/// Outcome of an idempotent write.
///
/// Writing an object whose digest is already present is a success, not an
/// error: content-addressing guarantees the existing bytes are identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Put {
    /// The object was newly written under this digest.
    Created(Digest),
    /// An object already existed under this digest; nothing was rewritten.
    Exists(Digest),
}

impl Put {
    /// The digest of the object, regardless of whether it was fresh.
    pub fn digest(&self) -> Digest {
        match self {
            Self::Created(d) | Self::Exists(d) => *d,
        }
    }

    /// Returns `true` if the write created a new entry.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written; the store never overwrites an
///   existing digest.
/// - `put` is idempotent: a second write of the same object returns
///   [`Put::Exists`] with the same digest.
/// - The store never interprets object contents beyond the canonical header.
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Write an object, returning its digest and whether it was fresh.
    fn put(&self, object: &Object) -> StoreResult<Put>;

    /// Read an object by digest.
    ///
    /// Fails with `ObjectNotFound` if no entry exists for the digest,
    /// `RepoNotInitialized` if the store root is absent, and `CorruptObject`
    /// if decompression or header parsing fails.
    fn get(&self, digest: &Digest) -> StoreResult<Object>;

    /// Check whether an object exists in the store.
    fn contains(&self, digest: &Digest) -> StoreResult<bool>;

    /// Delete an object by digest. Returns `true` if the object existed.
    ///
    /// Used only by staging-index maintenance; commit history is append-only
    /// and never deletes.
    fn delete(&self, digest: &Digest) -> StoreResult<bool>;
}
