use arbor_types::{ObjectFormat, ObjectId};

use crate::object::ObjectKind;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no object {0} in store")]
    NotFound(ObjectId),

    /// An id of another object format was presented to this store.
    #[error("object {id} is not a {expected} id")]
    FormatMismatch { id: ObjectId, expected: ObjectFormat },

    /// The object was decoded as the wrong kind.
    #[error("expected {expected}, got {actual}")]
    UnexpectedKind {
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("cannot encode or decode object: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
