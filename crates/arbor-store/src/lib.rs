//! Content-addressed object storage for Arbor.
//!
//! Blobs and trees are encoded into [`StoredObject`]s and kept under the
//! digest of their git-framed bytes, in the object format the store was
//! created for. Trees are what the diff engine walks; this crate only knows
//! how to encode, decode and look them up.
//!
//! - [`Blob`] -- file contents or a symlink target
//! - [`Tree`] -- sorted directory listing of [`TreeEntry`]s
//! - [`ObjectStore`] -- the storage seam; [`InMemoryObjectStore`] is the
//!   bundled backend

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use arbor_types::EntryMode;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
