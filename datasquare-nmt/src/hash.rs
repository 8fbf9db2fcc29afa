//! Namespaced node hashes and the pluggable digest function.

use core::fmt;

use bincode::{Decode, Encode};
use sha2::{Digest, Sha256};

use crate::{NAMESPACE_SIZE, NamespaceId};

/// Size of the plain digest part of a node.
pub const HASH_SIZE: usize = 32;
/// Size of a namespaced node: two namespaces followed by the digest.
pub const NAMESPACED_HASH_SIZE: usize = 2 * NAMESPACE_SIZE + HASH_SIZE;

/// Domain tag prepended to leaf hash inputs.
const LEAF_DOMAIN_TAG: u8 = 0x00;
/// Domain tag prepended to internal node hash inputs.
const INTERNAL_DOMAIN_TAG: u8 = 0x01;

/// Digest function used for leaf and internal node hashing.
pub trait MerkleHasher: Clone + Default + Send + Sync + 'static {
    /// Hash the concatenation of `parts`.
    fn digest(parts: &[&[u8]]) -> [u8; HASH_SIZE];
}

/// SHA-256, the digest used by Celestia-compatible trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn digest(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }
}

/// Blake3.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn digest(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }
}

/// A node of the namespaced Merkle tree: `min_ns || max_ns || digest`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub struct NamespacedHash([u8; NAMESPACED_HASH_SIZE]);

impl NamespacedHash {
    /// Assemble a node from its parts.
    pub fn new(min: NamespaceId, max: NamespaceId, digest: [u8; HASH_SIZE]) -> Self {
        let mut bytes = [0u8; NAMESPACED_HASH_SIZE];
        bytes[..NAMESPACE_SIZE].copy_from_slice(min.as_bytes());
        bytes[NAMESPACE_SIZE..2 * NAMESPACE_SIZE].copy_from_slice(max.as_bytes());
        bytes[2 * NAMESPACE_SIZE..].copy_from_slice(&digest);
        NamespacedHash(bytes)
    }

    /// Reinterpret raw node bytes.
    pub fn from_bytes(bytes: [u8; NAMESPACED_HASH_SIZE]) -> Self {
        NamespacedHash(bytes)
    }

    /// The root of a tree without leaves: zero namespaces and `H("")`.
    pub fn empty_root<H: MerkleHasher>() -> Self {
        Self::new(NamespaceId::MIN, NamespaceId::MIN, H::digest(&[]))
    }

    /// Hash a namespaced leaf. `data` excludes the namespace prefix.
    pub fn leaf<H: MerkleHasher>(namespace: NamespaceId, data: &[u8]) -> Self {
        let digest = H::digest(&[&[LEAF_DOMAIN_TAG], namespace.as_bytes(), data]);
        Self::new(namespace, namespace, digest)
    }

    /// Merge two sibling nodes.
    ///
    /// With `ignore_max_namespace` set, a right child whose range starts at
    /// [`NamespaceId::MAX`] does not raise the parent's maximum namespace.
    pub fn merge<H: MerkleHasher>(
        left: &NamespacedHash,
        right: &NamespacedHash,
        ignore_max_namespace: bool,
    ) -> Self {
        let min = left.min_namespace().min(right.min_namespace());
        let max = if ignore_max_namespace && right.min_namespace().is_max() {
            left.max_namespace()
        } else {
            left.max_namespace().max(right.max_namespace())
        };
        let digest = H::digest(&[&[INTERNAL_DOMAIN_TAG], &left.0, &right.0]);
        Self::new(min, max, digest)
    }

    /// Lowest namespace under this node.
    pub fn min_namespace(&self) -> NamespaceId {
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes.copy_from_slice(&self.0[..NAMESPACE_SIZE]);
        NamespaceId(bytes)
    }

    /// Highest namespace under this node.
    pub fn max_namespace(&self) -> NamespaceId {
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes.copy_from_slice(&self.0[NAMESPACE_SIZE..2 * NAMESPACE_SIZE]);
        NamespaceId(bytes)
    }

    /// The digest part of the node.
    pub fn digest(&self) -> &[u8] {
        &self.0[2 * NAMESPACE_SIZE..]
    }

    /// Raw node bytes.
    pub fn to_array(&self) -> [u8; NAMESPACED_HASH_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for NamespacedHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NamespacedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NamespacedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedHash")
            .field("min", &self.min_namespace())
            .field("max", &self.max_namespace())
            .field("digest", &hex::encode(self.digest()))
            .finish()
    }
}

/// Split point for a node over `len` leaves: the largest power of two
/// strictly less than `len`. `len` must be at least 2.
pub(crate) fn split_point(len: usize) -> usize {
    debug_assert!(len >= 2);
    len.next_power_of_two() / 2
}
