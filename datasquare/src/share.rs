//! Shares and their coordinates in the extended square.

use std::sync::Arc;

use datasquare_nmt::{NAMESPACE_SIZE, NamespaceId};

use crate::{Error, Result};

/// A fixed-size unit of square data: a namespace prefix followed by payload.
///
/// Immutable. Cloning shares the underlying bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Share(Arc<[u8]>);

impl Share {
    /// Wrap raw share bytes. The bytes must at least hold a namespace.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() < NAMESPACE_SIZE {
            return Err(Error::ShareTooShort { len: bytes.len() });
        }
        Ok(Share(bytes))
    }

    /// Build a share from a namespace and a payload.
    pub fn from_parts(namespace: NamespaceId, payload: &[u8]) -> Self {
        Share([namespace.as_bytes(), payload].concat().into())
    }

    /// The namespace prefix embedded in the share.
    pub fn namespace(&self) -> NamespaceId {
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes.copy_from_slice(&self.0[..NAMESPACE_SIZE]);
        NamespaceId(bytes)
    }

    /// Bytes after the namespace prefix.
    pub fn payload(&self) -> &[u8] {
        &self.0[NAMESPACE_SIZE..]
    }

    /// The whole share.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Share size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; shares hold at least a namespace.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Share {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Share::new(bytes)
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("namespace", &self.namespace())
            .field("len", &self.len())
            .finish()
    }
}

/// Orientation of a tree in the square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Col,
}

/// Position of a share as seen by one axis tree.
///
/// `axis` is the index of the row or column the tree commits to; `cell` is
/// the share's position inside it. For a row tree, `(axis, cell)` is
/// `(row, column)`; for a column tree it is `(column, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquareIndex {
    pub axis: usize,
    pub cell: usize,
}

impl SquareIndex {
    pub fn new(axis: usize, cell: usize) -> Self {
        Self { axis, cell }
    }

    /// Which half of the extended square this position falls in, given the
    /// original width. Anything outside quadrant Q0 is parity.
    pub fn half(&self, original_width: usize) -> SquareHalf {
        if self.axis >= original_width || self.cell >= original_width {
            SquareHalf::Parity
        } else {
            SquareHalf::Original
        }
    }
}

/// Whether a share is original data or erasure-coded parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareHalf {
    Original,
    Parity,
}
