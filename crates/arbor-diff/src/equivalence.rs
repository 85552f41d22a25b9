//! Which entry modes count as the same kind of entry.
//!
//! Old trees may record regular files with the group-writable mode
//! (`100664`). Such a file is the same file as one recorded with `100644`:
//! flipping between the two never produces a change. Every other mode is a
//! class of its own, and an entry that changes class at the same path is
//! reported as a delete of the old entry plus an insert of the new one.

use arbor_types::EntryMode;

/// Equivalence class of an [`EntryMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModeClass {
    Regular,
    Executable,
    Symlink,
    Directory,
    Submodule,
}

impl ModeClass {
    /// The class `mode` belongs to.
    pub fn of(mode: EntryMode) -> Self {
        match mode {
            EntryMode::Regular | EntryMode::Deprecated => Self::Regular,
            EntryMode::Executable => Self::Executable,
            EntryMode::Symlink => Self::Symlink,
            EntryMode::Directory => Self::Directory,
            EntryMode::Submodule => Self::Submodule,
        }
    }
}

/// Returns `true` if `a` and `b` denote the same kind of entry.
pub fn same_class(a: EntryMode, b: EntryMode) -> bool {
    ModeClass::of(a) == ModeClass::of(b)
}
