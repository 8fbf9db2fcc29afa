use core::fmt;

use bincode::{Decode, Encode};

use crate::{NmtError, Result};

/// Width of a namespace id in bytes.
pub const NAMESPACE_SIZE: usize = 8;

/// A namespace identifier. Ordering is lexicographic over the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Encode, Decode)]
pub struct NamespaceId(pub [u8; NAMESPACE_SIZE]);

impl NamespaceId {
    /// The lowest namespace, all zero bytes.
    pub const MIN: NamespaceId = NamespaceId([0x00; NAMESPACE_SIZE]);
    /// The highest namespace, all `0xff` bytes.
    pub const MAX: NamespaceId = NamespaceId([0xff; NAMESPACE_SIZE]);

    /// Read the namespace prefix of `data`.
    pub fn from_prefix(data: &[u8]) -> Result<Self> {
        let prefix = data
            .get(..NAMESPACE_SIZE)
            .ok_or(NmtError::LeafTooShort {
                len: data.len(),
                namespace_size: NAMESPACE_SIZE,
            })?;
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes.copy_from_slice(prefix);
        Ok(NamespaceId(bytes))
    }

    /// Raw namespace bytes.
    pub fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }

    /// Whether this is the maximum namespace.
    pub fn is_max(&self) -> bool {
        *self == Self::MAX
    }
}

impl From<[u8; NAMESPACE_SIZE]> for NamespaceId {
    fn from(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        NamespaceId(bytes)
    }
}

impl AsRef<[u8]> for NamespaceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespaceId({})", hex::encode(self.0))
    }
}
