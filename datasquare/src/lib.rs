//! Extended data squares.
//!
//! An `N x N` square of namespaced shares is erasure-coded into a `2N x 2N`
//! square and every row and column is committed to by an erasured
//! namespaced Merkle tree (ENMT):
//!
//! ```text
//!  +-----+-----+
//!  | Q0  | Q1  |   Q0: original data
//!  +-----+-----+   Q1: row parity of Q0
//!  | Q2  | Q3  |   Q2: column parity of Q0
//!  +-----+-----+   Q3: row parity of Q2
//! ```
//!
//! Inside each axis tree, shares of Q0 keep their own namespace and all
//! parity shares are filed under [`PARITY_SHARES_NAMESPACE`], so a row or
//! column root still proves which namespaces the original data covers.

mod builder;
mod codec;
mod config;
mod enmt;
mod error;
mod leaf_buffer;
mod namespace;
mod share;
mod square;
mod tree;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod tests;

pub use builder::{
    ExtendedDataSquareBuilder, RootOf, compute_extended_data_square, extend_square,
};
pub use codec::{Codec, ReedSolomonCodec};
pub use config::{DEFAULT_MAX_ORIGINAL_WIDTH, DEFAULT_SHARE_SIZE, SquareConfig};
pub use datasquare_nmt::{
    Blake3Hasher, MerkleHasher, NAMESPACE_SIZE, NamespaceId, NamespaceMerkleTree, NamespacedHash,
    NmtError, RangeProof, Sha256Hasher,
};
pub use enmt::{ErasuredNamespacedMerkleTree, ErasuredNmtConstructor};
pub use error::{Error, Result};
pub use leaf_buffer::OrderedLeafBuffer;
pub use namespace::{PARITY_SHARES_NAMESPACE, assign_namespace};
pub use share::{Axis, Share, SquareHalf, SquareIndex};
pub use square::ExtendedDataSquare;
pub use tree::{Tree, TreeConstructor};
