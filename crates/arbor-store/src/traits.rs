use arbor_types::{ObjectFormat, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;

/// Objects keyed by the digest of their framed bytes.
///
/// Stored objects never change, so any number of readers (including tree
/// diffs running on several threads) may share one store. Ids of another
/// object format are rejected rather than looked up.
pub trait ObjectStore: Send + Sync {
    /// The object format of every id this store hands out.
    fn format(&self) -> ObjectFormat;

    /// `Ok(None)` when nothing is stored under `id`.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Store `object` and return its id. Writing an object twice is a no-op.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.read(id)?.is_some())
    }

    /// Drop the object under `id`, returning whether there was one.
    ///
    /// Trees still naming the object become unreadable.
    fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Like [`read`](Self::read), with absence as [`StoreError::NotFound`].
    fn read_required(&self, id: &ObjectId) -> StoreResult<StoredObject> {
        self.read(id)?.ok_or(StoreError::NotFound(*id))
    }
}
