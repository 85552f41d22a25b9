//! Digest registry and object hashing for Arbor.
//!
//! Every object identity in Arbor is a digest produced by a hash function
//! looked up in a [`DigestRegistry`]. The registry is an explicit
//! configuration object: build it once at startup, override algorithms if a
//! hardened or accelerated implementation is wanted, then share it behind an
//! `Arc`. Once shared it can no longer be mutated, so registration can never
//! race with lookups.
//!
//! All hashing wraps established libraries — no custom cryptography.

pub mod error;
pub mod hasher;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use hasher::ObjectHasher;
pub use registry::{CoreDigester, DigestRegistry, Digester, DigesterFactory, HashFunction};
