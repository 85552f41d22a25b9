use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Group-writable regular file (0o100664). Only found in old trees;
    /// readers must treat it as [`EntryMode::Regular`].
    Deprecated,
    /// Executable file (0o100755).
    Executable,
    /// Symbolic link (0o120000).
    Symlink,
    /// Subtree / directory (0o040000).
    Directory,
    /// Link to a commit in another repository (0o160000).
    Submodule,
}

impl EntryMode {
    /// Octal mode value (for display/serialization).
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Deprecated => 0o100664,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
            Self::Submodule => 0o160000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Result<Self, TypeError> {
        match bits {
            0o100644 => Ok(Self::Regular),
            0o100664 => Ok(Self::Deprecated),
            0o100755 => Ok(Self::Executable),
            0o120000 => Ok(Self::Symlink),
            0o040000 => Ok(Self::Directory),
            0o160000 => Ok(Self::Submodule),
            _ => Err(TypeError::InvalidMode(bits)),
        }
    }

    /// Returns `true` for entries that hold child entries.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` for entries whose content is a blob.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::Regular | Self::Deprecated | Self::Executable)
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}
