use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;
use crate::format::ObjectFormat;

const MAX_SIZE: usize = 32;

/// Content-addressed identifier for any stored object.
///
/// An `ObjectId` is the digest of an object's content in the repository's
/// [`ObjectFormat`]: 20 bytes for SHA-1, 32 bytes for SHA-256. Equality is
/// byte-wise. The id says what an object *is*, never where it lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    len: u8,
    bytes: [u8; MAX_SIZE],
}

impl ObjectId {
    /// Build an id from a finished digest.
    ///
    /// Fails unless `digest` has the length of a recognized format.
    pub fn from_slice(digest: &[u8]) -> Result<Self, TypeError> {
        if ObjectFormat::from_size(digest.len()).is_none() {
            return Err(TypeError::InvalidLength(digest.len()));
        }
        let mut bytes = [0u8; MAX_SIZE];
        bytes[..digest.len()].copy_from_slice(digest);
        Ok(Self {
            len: digest.len() as u8,
            bytes,
        })
    }

    /// Create a SHA-256 `ObjectId` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self {
            len: 32,
            bytes: hash,
        }
    }

    /// The null object ID (all zeros) for `format`. Represents "no object".
    pub fn null(format: ObjectFormat) -> Self {
        Self {
            len: format.size() as u8,
            bytes: [0u8; MAX_SIZE],
        }
    }

    /// Returns `true` if this is the null object ID.
    pub fn is_null(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }

    /// The format this id was produced in, derived from its length.
    pub fn format(&self) -> ObjectFormat {
        match self.len {
            20 => ObjectFormat::Sha1,
            _ => ObjectFormat::Sha256,
        }
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.bytes[..4])
    }

    /// Parse from a 40 (SHA-1) or 64 (SHA-256) character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl PartialOrd for ObjectId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for ObjectId {
    fn from(bytes: [u8; 20]) -> Self {
        let mut buf = [0u8; MAX_SIZE];
        buf[..20].copy_from_slice(&bytes);
        Self { len: 20, bytes: buf }
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(bytes: [u8; 32]) -> Self {
        Self::from_hash(bytes)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
