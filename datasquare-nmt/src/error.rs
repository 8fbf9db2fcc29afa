use thiserror::Error;

use crate::NamespaceId;

/// Alias for `core::result::Result<T, NmtError>`.
pub type Result<T> = core::result::Result<T, NmtError>;

/// Errors from namespaced Merkle tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NmtError {
    /// The pushed data cannot hold a namespace prefix.
    #[error("leaf of {len} bytes is shorter than the {namespace_size} byte namespace")]
    LeafTooShort {
        /// Length of the rejected data.
        len: usize,
        /// Required namespace prefix length.
        namespace_size: usize,
    },
    /// Leaves have to be pushed in non-decreasing namespace order.
    #[error("leaf namespace {current} is lower than the previous namespace {previous}")]
    OutOfOrder {
        /// Namespace of the last accepted leaf.
        previous: NamespaceId,
        /// Namespace of the rejected leaf.
        current: NamespaceId,
    },
    /// A requested leaf range is empty or beyond the tree.
    #[error("invalid leaf range [{start}, {end}) for a tree of {leaf_count} leaves")]
    InvalidRange {
        /// First leaf of the range.
        start: usize,
        /// One past the last leaf of the range.
        end: usize,
        /// Leaves in the tree.
        leaf_count: usize,
    },
    /// No leaf carries the requested namespace.
    #[error("namespace {0} is not present in the tree")]
    NamespaceNotFound(NamespaceId),
    /// A proof failed structural checks or does not match the root.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
