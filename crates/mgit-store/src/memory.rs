use std::collections::HashMap;
use std::sync::RwLock;

use mgit_types::Digest;

use crate::error::{StoreError, StoreResult};
use crate::object::Object;
use crate::traits::{ObjectStore, Put};

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. All objects are held in memory behind a
/// `RwLock`. Objects are cloned on read/write.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<Digest, Object>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put(&self, object: &Object) -> StoreResult<Put> {
        let digest = object.digest();
        let mut map = self.objects.write().expect("lock poisoned");
        if map.contains_key(&digest) {
            return Ok(Put::Exists(digest));
        }
        map.insert(digest, object.clone());
        Ok(Put::Created(digest))
    }

    fn get(&self, digest: &Digest) -> StoreResult<Object> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(digest)
            .cloned()
            .ok_or(StoreError::ObjectNotFound(*digest))
    }

    fn contains(&self, digest: &Digest) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(digest))
    }

    fn delete(&self, digest: &Digest) -> StoreResult<bool> {
        let mut map = self.objects.write().expect("lock poisoned");
        Ok(map.remove(digest).is_some())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}
