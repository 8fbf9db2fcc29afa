//! Namespaced Merkle tree (NMT).
//!
//! Every node of the tree carries the minimum and maximum namespace of the
//! leaves below it, which makes it possible to prove that a set of leaves is
//! the complete content of a namespace. Leaves must be pushed in
//! non-decreasing namespace order.
//!
//! Node layout (48 bytes): `min_ns || max_ns || H(..)`
//!
//! - Leaf nodes:     `ns || ns || H(0x00 || ns || data)`
//! - Internal nodes: `min || max || H(0x01 || left || right)`
//!
//! The tree shape follows RFC 6962: a node over `n` leaves splits at the
//! largest power of two strictly less than `n`.

#![warn(missing_docs)]

mod error;
mod hash;
mod namespace;
mod proof;
mod tree;


pub use error::{NmtError, Result};
pub use hash::{
    Blake3Hasher, HASH_SIZE, MerkleHasher, NAMESPACED_HASH_SIZE, NamespacedHash, Sha256Hasher,
};
pub use namespace::{NAMESPACE_SIZE, NamespaceId};
pub use proof::RangeProof;
pub use tree::NamespaceMerkleTree;
