//! Foundation types for Arbor.
//!
//! This crate provides the identity and structural types shared by every
//! other Arbor crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (SHA-1 or SHA-256 digest)
//! - [`ObjectFormat`] — Which digest algorithm a repository uses
//! - [`EntryMode`] — The mode class of a tree entry

pub mod error;
pub mod format;
pub mod mode;
pub mod object;

pub use error::TypeError;
pub use format::ObjectFormat;
pub use mode::EntryMode;
pub use object::ObjectId;
