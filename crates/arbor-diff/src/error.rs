//! Error types for the diff crate.

use arbor_types::ObjectId;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A root tree referenced by the caller was not found in the store.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The children of a directory could not be read. The whole diff is
    /// abandoned; no partial result is returned.
    #[error("cannot read tree at {path:?}: {source}")]
    TreeRead {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A change with neither side present. Never produced by the engine.
    #[error("malformed change: both sides are absent")]
    MalformedChange,
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
