use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use arbor_crypto::ObjectHasher;
use arbor_types::{EntryMode, ObjectId};

use crate::error::{StoreError, StoreResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Blob,
    Tree,
}

impl ObjectKind {
    /// The tag hashed in front of the object data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded bytes of one object, tagged with its kind.
///
/// This is what stores hold. Its id is the digest of the git-framed bytes,
/// so the same content under two kinds gets two ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub kind: ObjectKind,
    pub data: Vec<u8>,
    pub size: u64,
}

impl StoredObject {
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self {
            size: data.len() as u64,
            kind,
            data,
        }
    }

    pub fn compute_id(&self, hasher: &ObjectHasher) -> ObjectId {
        hasher.hash(self.kind.as_str(), &self.data)
    }

    fn expect_kind(&self, expected: ObjectKind) -> StoreResult<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(StoreError::UnexpectedKind {
                expected,
                actual: self.kind,
            })
        }
    }
}

/// File contents or a symlink target, stored verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Blob)?;
        Ok(Self::new(obj.data.clone()))
    }
}

/// One named child of a [`Tree`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub mode: EntryMode,
    /// Path segment, unique within its tree.
    pub name: String,
    /// Blob, tree or (for submodules) commit the entry points at.
    pub object_id: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.mode.mode_bits().cmp(&other.mode.mode_bits()))
            .then_with(|| self.object_id.cmp(&other.object_id))
    }
}

/// A directory snapshot: its entries, kept sorted by name.
///
/// Encoded as JSON. Equal entry sets always encode to equal bytes, which is
/// what lets unchanged directories keep their id across snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data = serde_json::to_vec(self).map_err(serialization)?;
        Ok(StoredObject::new(ObjectKind::Tree, data))
    }

    /// Decode a tree object. Entries written out of order are re-sorted.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.expect_kind(ObjectKind::Tree)?;
        let Self { entries } = serde_json::from_slice(&obj.data).map_err(serialization)?;
        Ok(Self::new(entries))
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        let idx = self
            .entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()?;
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn serialization(err: serde_json::Error) -> StoreError {
    StoreError::Serialization(err.to_string())
}
