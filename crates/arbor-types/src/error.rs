use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid digest length: {0} bytes is neither a SHA-1 nor a SHA-256 digest")]
    InvalidLength(usize),

    #[error("invalid object format: {0:?}")]
    InvalidObjectFormat(String),

    #[error("invalid entry mode: {0:o}")]
    InvalidMode(u32),
}
