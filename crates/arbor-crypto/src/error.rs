//! Error types for the digest registry.

use thiserror::Error;

use crate::registry::HashFunction;

/// Errors from registry configuration and format resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The hash function cannot back any object format.
    #[error("unsupported hash function: {0}")]
    UnsupportedFormat(HashFunction),

    /// A registration supplied no factory, or one producing the wrong size.
    #[error("cannot register hash: {0}")]
    InvalidArgument(String),

    /// An object-format token is not one of the recognized set.
    #[error("invalid object format: {0:?}")]
    InvalidObjectFormat(String),
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
