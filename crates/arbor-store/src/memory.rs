use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use arbor_crypto::ObjectHasher;
use arbor_types::{ObjectFormat, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// [`ObjectStore`] holding everything in a `HashMap`.
///
/// Used for snapshots that only live as long as one command, and in tests.
pub struct InMemoryObjectStore {
    hasher: ObjectHasher,
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new(hasher: ObjectHasher) -> Self {
        Self {
            hasher,
            objects: RwLock::default(),
        }
    }

    /// Empty store using the default digest of `format`.
    pub fn with_format(format: ObjectFormat) -> Self {
        Self::new(ObjectHasher::with_defaults(format))
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }

    // Objects are never modified in place, so a panicking writer cannot
    // leave the map half-updated; poisoning is ignored.
    fn objects(&self) -> RwLockReadGuard<'_, HashMap<ObjectId, StoredObject>> {
        self.objects.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn objects_mut(&self) -> RwLockWriteGuard<'_, HashMap<ObjectId, StoredObject>> {
        self.objects.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_format(&self, id: &ObjectId) -> StoreResult<()> {
        let expected = self.hasher.format();
        if id.format() == expected {
            Ok(())
        } else {
            Err(StoreError::FormatMismatch { id: *id, expected })
        }
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn format(&self) -> ObjectFormat {
        self.hasher.format()
    }

    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        self.check_format(id)?;
        Ok(self.objects().get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id(&self.hasher);
        self.objects_mut().entry(id).or_insert_with(|| {
            trace!(id = %id.short_hex(), kind = %object.kind, size = object.size, "stored object");
            object.clone()
        });
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        self.check_format(id)?;
        Ok(self.objects().contains_key(id))
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        self.check_format(id)?;
        Ok(self.objects_mut().remove(id).is_some())
    }
}

impl fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("format", &self.hasher.format())
            .field("objects", &self.len())
            .finish()
    }
}
