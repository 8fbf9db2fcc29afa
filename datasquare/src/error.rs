//! Error types for square construction.

use datasquare_nmt::{NamespaceId, NmtError};
use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from tree insertion, erasure coding and square assembly.
///
/// None of these are transient: they mean the caller handed over a
/// malformed square or pushed shares in the wrong order. A build that hits
/// any of them returns no square.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("tree is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("share at cell {cell} has namespace {current}, lower than the previous {previous}")]
    OrderViolation {
        previous: NamespaceId,
        current: NamespaceId,
        cell: usize,
    },
    #[error("index (axis {axis}, cell {cell}) is outside a square of width {width}")]
    IndexOutOfRange {
        axis: usize,
        cell: usize,
        width: usize,
    },
    #[error("original share uses the reserved parity namespace")]
    ReservedNamespace,
    #[error("share of {len} bytes cannot hold a namespace")]
    ShareTooShort { len: usize },
    #[error("tree holds {capacity} shares but the square is {expected} wide")]
    TreeSizeMismatch { expected: usize, capacity: usize },
    #[error("codec error: {0}")]
    Codec(String),
    #[error("{shares} shares do not form a non-empty square")]
    InvalidSquareSize { shares: usize },
    #[error("square width {width} exceeds the maximum of {max}")]
    TooManyShares { width: usize, max: usize },
    #[error("share {position} is {found} bytes, expected {expected}")]
    UnevenShares {
        position: usize,
        expected: usize,
        found: usize,
    },
    #[error("nmt error: {0}")]
    Nmt(#[from] NmtError),
}
