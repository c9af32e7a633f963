//! Filesystem object store: one zlib-compressed file per digest.
//!
//! Layout under the repository directory:
//!
//! ```text
//! .mgit/
//!   objects/
//!     <40-hex-digest>   zlib(encode(object))
//! ```
//!
//! The objects directory is created lazily on first write. Writes to a fresh
//! key are atomic at the filesystem level, but multi-object operations are
//! not transactional; callers must sequence ref updates after all object
//! writes (see the commit orchestration in `mgit-commit`).

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use mgit_types::Digest;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::Object;
use crate::traits::{ObjectStore, Put};

/// Filesystem-backed content-addressed object store.
pub struct FsObjectStore {
    /// The repository metadata directory (`<workdir>/.mgit`).
    root: PathBuf,
}

impl FsObjectStore {
    /// Open a store rooted at an existing repository directory.
    ///
    /// Fails with `RepoNotInitialized` if the directory does not exist.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::RepoNotInitialized);
        }
        Ok(Self { root })
    }

    /// The repository metadata directory this store is rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn objects_dir(&self) -> PathBuf {
        self.root.join("objects")
    }

    fn object_path(&self, digest: &Digest) -> PathBuf {
        self.objects_dir().join(digest.to_hex())
    }

    fn compress(bytes: &[u8]) -> StoreResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        Ok(encoder.finish()?)
    }

    fn decompress(digest: &Digest, bytes: &[u8]) -> StoreResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| StoreError::CorruptObject {
                digest: *digest,
                reason: format!("zlib decompression failed: {e}"),
            })?;
        Ok(out)
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, object: &Object) -> StoreResult<Put> {
        if !self.root.is_dir() {
            return Err(StoreError::RepoNotInitialized);
        }

        let digest = object.digest();
        let path = self.object_path(&digest);
        if path.is_file() {
            debug!(digest = %digest, "object already exists, skipping write");
            return Ok(Put::Exists(digest));
        }

        // Lazy creation on first write.
        std::fs::create_dir_all(self.objects_dir())?;

        let compressed = Self::compress(&object.encode())?;
        std::fs::write(&path, compressed)?;
        debug!(digest = %digest, kind = %object.kind, "object written");
        Ok(Put::Created(digest))
    }

    fn get(&self, digest: &Digest) -> StoreResult<Object> {
        if !self.root.is_dir() {
            return Err(StoreError::RepoNotInitialized);
        }

        let path = self.object_path(digest);
        let compressed = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::ObjectNotFound(*digest));
            }
            Err(e) => return Err(e.into()),
        };

        let encoded = Self::decompress(digest, &compressed)?;
        Object::decode(*digest, &encoded)
    }

    fn contains(&self, digest: &Digest) -> StoreResult<bool> {
        if !self.root.is_dir() {
            return Err(StoreError::RepoNotInitialized);
        }
        Ok(self.object_path(digest).is_file())
    }

    fn delete(&self, digest: &Digest) -> StoreResult<bool> {
        if !self.root.is_dir() {
            return Err(StoreError::RepoNotInitialized);
        }
        match std::fs::remove_file(self.object_path(digest)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("root", &self.root)
            .finish()
    }
}
