//! Merkle tree diff engine for Arbor.
//!
//! Computes the structural changes (inserts, deletes, modifications) that
//! turn one content-addressed tree into another. Subtrees whose identities
//! match are skipped without being read, so the cost of a diff is
//! proportional to what changed, not to the size of the trees.
//!
//! # Key Types
//!
//! - [`Noder`] -- read-only view of one tree entry
//! - [`NoderPath`] -- the entries from a tree root down to one entry
//! - [`TreeSource`] -- resolves the children of a directory noder
//! - [`Change`] / [`Changes`] / [`Action`] -- the diff result
//!
//! # Entry Points
//!
//! - [`diff`] -- diff two root noders over any [`TreeSource`]
//! - [`diff_trees`] -- diff two stored trees by id

pub mod change;
pub mod equivalence;
pub mod error;
pub mod merkle;
pub mod noder;
pub mod path;
pub mod source;

#[cfg(test)]
mod fixture;

pub use change::{Action, Change, Changes};
pub use equivalence::{same_class, ModeClass};
pub use error::{DiffError, DiffResult};
pub use merkle::diff;
pub use noder::{Identity, Noder};
pub use path::NoderPath;
pub use source::{diff_trees, StoreTreeSource, TreeSource};
