use std::cmp::Ordering;

use arbor_types::{EntryMode, ObjectId};

use crate::equivalence::ModeClass;

/// Read-only view of one entry in a content-addressed tree.
///
/// Noders are built on demand from stored tree entries and live for one diff
/// invocation. Only [`Noder::Directory`] has children; they are resolved
/// lazily through a [`TreeSource`](crate::TreeSource).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Noder {
    /// A blob with a regular, deprecated-regular or executable mode.
    File {
        name: String,
        hash: ObjectId,
        mode: EntryMode,
    },
    Directory {
        name: String,
        hash: ObjectId,
    },
    Symlink {
        name: String,
        hash: ObjectId,
    },
    Submodule {
        name: String,
        hash: ObjectId,
    },
}

/// What two noders are compared by.
///
/// The content digest plus the mode class. The raw mode never takes part, so
/// a regular file and its deprecated-mode twin share one identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    pub content: ObjectId,
    pub class: ModeClass,
}

impl Noder {
    /// Build the noder for a tree entry.
    pub fn from_entry(name: impl Into<String>, mode: EntryMode, hash: ObjectId) -> Self {
        let name = name.into();
        match mode {
            EntryMode::Regular | EntryMode::Deprecated | EntryMode::Executable => {
                Self::File { name, hash, mode }
            }
            EntryMode::Directory => Self::Directory { name, hash },
            EntryMode::Symlink => Self::Symlink { name, hash },
            EntryMode::Submodule => Self::Submodule { name, hash },
        }
    }

    /// The unnamed directory at the top of a tree.
    pub fn root(hash: ObjectId) -> Self {
        Self::Directory {
            name: String::new(),
            hash,
        }
    }

    /// Path segment of this entry, unique among its siblings.
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. }
            | Self::Directory { name, .. }
            | Self::Symlink { name, .. }
            | Self::Submodule { name, .. } => name,
        }
    }

    /// Digest of the referenced object.
    pub fn hash(&self) -> &ObjectId {
        match self {
            Self::File { hash, .. }
            | Self::Directory { hash, .. }
            | Self::Symlink { hash, .. }
            | Self::Submodule { hash, .. } => hash,
        }
    }

    /// The mode recorded in the tree entry.
    pub fn mode(&self) -> EntryMode {
        match self {
            Self::File { mode, .. } => *mode,
            Self::Directory { .. } => EntryMode::Directory,
            Self::Symlink { .. } => EntryMode::Symlink,
            Self::Submodule { .. } => EntryMode::Submodule,
        }
    }

    pub fn class(&self) -> ModeClass {
        ModeClass::of(self.mode())
    }

    pub fn identity(&self) -> Identity {
        Identity {
            content: *self.hash(),
            class: self.class(),
        }
    }

    /// Returns `true` if this noder has children.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

impl PartialOrd for Noder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Noder {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.mode().mode_bits().cmp(&other.mode().mode_bits()))
            .then_with(|| self.hash().cmp(other.hash()))
    }
}
