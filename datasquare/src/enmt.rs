//! Erasured namespaced Merkle tree.
//!
//! A namespaced Merkle tree for one row or column of an extended data
//! square. Each share is inserted as `namespace || share`, where the
//! namespace is the share's own prefix in quadrant Q0 and
//! [`PARITY_SHARES_NAMESPACE`](crate::PARITY_SHARES_NAMESPACE) anywhere
//! else. Parity shares therefore always sort after original data and never
//! widen the namespace range of the root.

use datasquare_nmt::{
    MerkleHasher, NAMESPACE_SIZE, NamespaceId, NamespaceMerkleTree, NamespacedHash, Sha256Hasher,
};

use crate::{
    Error, OrderedLeafBuffer, Result, SquareIndex, Tree, TreeConstructor,
    leaf_buffer::MAX_PREALLOCATED_LEAVES, namespace::assign_namespace,
};

/// Namespaced Merkle tree over one axis of an extended data square.
///
/// Bound at construction to an original square width `N`; accepts at most
/// `2N` shares.
#[derive(Debug, Clone)]
pub struct ErasuredNamespacedMerkleTree<H: MerkleHasher = Sha256Hasher> {
    original_width: usize,
    buffer: OrderedLeafBuffer,
    tree: NamespaceMerkleTree<H>,
}

impl<H: MerkleHasher> ErasuredNamespacedMerkleTree<H> {
    /// Create an empty tree for a square whose original width is
    /// `original_width`.
    ///
    /// A width whose extension does not fit in `usize` gets a capacity of
    /// `usize::MAX`.
    pub fn new(original_width: usize) -> Self {
        let capacity = original_width.saturating_mul(2);
        Self {
            original_width,
            buffer: OrderedLeafBuffer::new(capacity),
            tree: NamespaceMerkleTree::with_capacity(capacity.min(MAX_PREALLOCATED_LEAVES)),
        }
    }

    /// Width of the non-extended square.
    pub fn original_width(&self) -> usize {
        self.original_width
    }

    /// Maximum number of shares, the extended width.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Shares pushed so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Namespaces assigned to the pushed shares, in order.
    pub fn namespaces(&self) -> &[NamespaceId] {
        self.buffer.namespaces()
    }

    /// Insert `share` located at `index`.
    ///
    /// Checks, in order: capacity, index range, namespace assignment and
    /// namespace order. On any failure the tree is left untouched and the
    /// caller must abandon the square it is building. `index.cell` only
    /// decides the share's half; leaves are appended in push order.
    pub fn push(&mut self, share: &[u8], index: SquareIndex) -> Result<()> {
        self.buffer.check_capacity()?;

        let width = self.capacity();
        if index.axis >= width || index.cell >= width {
            return Err(Error::IndexOutOfRange {
                axis: index.axis,
                cell: index.cell,
                width,
            });
        }

        let namespace = assign_namespace(share, index.half(self.original_width))?;
        self.buffer.check_order(namespace, index.cell)?;

        let mut leaf = Vec::with_capacity(NAMESPACE_SIZE + share.len());
        leaf.extend_from_slice(namespace.as_bytes());
        leaf.extend_from_slice(share);
        self.tree.push(&leaf)?;
        self.buffer.accept(namespace);
        Ok(())
    }

    /// Root of the underlying tree over the shares pushed so far.
    pub fn root(&self) -> NamespacedHash {
        self.tree.root()
    }

    /// The wrapped namespaced Merkle tree, for proof generation.
    pub fn tree(&self) -> &NamespaceMerkleTree<H> {
        &self.tree
    }
}

impl<H: MerkleHasher> Tree for ErasuredNamespacedMerkleTree<H> {
    type Root = NamespacedHash;

    fn capacity(&self) -> usize {
        ErasuredNamespacedMerkleTree::capacity(self)
    }

    fn push(&mut self, share: &[u8], index: SquareIndex) -> Result<()> {
        ErasuredNamespacedMerkleTree::push(self, share, index)
    }

    fn root(&self) -> NamespacedHash {
        ErasuredNamespacedMerkleTree::root(self)
    }
}

/// Factory of independent [`ErasuredNamespacedMerkleTree`]s for one square.
#[derive(Debug, Clone, Copy)]
pub struct ErasuredNmtConstructor<H: MerkleHasher = Sha256Hasher> {
    original_width: usize,
    _hasher: core::marker::PhantomData<H>,
}

impl ErasuredNmtConstructor {
    /// Constructor of SHA-256 trees for a square of width `original_width`.
    pub fn new(original_width: usize) -> Self {
        Self::with_hasher(original_width)
    }
}

impl<H: MerkleHasher> ErasuredNmtConstructor<H> {
    pub fn with_hasher(original_width: usize) -> Self {
        Self {
            original_width,
            _hasher: core::marker::PhantomData,
        }
    }

    pub fn original_width(&self) -> usize {
        self.original_width
    }
}

impl<H: MerkleHasher> TreeConstructor for ErasuredNmtConstructor<H> {
    type Tree = ErasuredNamespacedMerkleTree<H>;

    fn construct(&self) -> Self::Tree {
        ErasuredNamespacedMerkleTree::new(self.original_width)
    }
}
