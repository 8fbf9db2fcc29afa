use core::marker::PhantomData;

use crate::{
    MerkleHasher, NAMESPACE_SIZE, NamespaceId, NamespacedHash, NmtError, RangeProof, Result,
    Sha256Hasher, hash::split_point,
};

/// An append-only namespaced Merkle tree held in memory.
///
/// Leaves are namespaced data: the first [`NAMESPACE_SIZE`] bytes are the
/// namespace, the rest is the payload. Leaf hashes are computed on push;
/// internal nodes are recomputed on every [`root`](Self::root) call.
#[derive(Clone, Debug)]
pub struct NamespaceMerkleTree<H: MerkleHasher = Sha256Hasher> {
    leaves: Vec<Vec<u8>>,
    leaf_hashes: Vec<NamespacedHash>,
    ignore_max_namespace: bool,
    _hasher: PhantomData<H>,
}

impl<H: MerkleHasher> Default for NamespaceMerkleTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MerkleHasher> NamespaceMerkleTree<H> {
    /// Create an empty tree that ignores the maximum namespace when merging
    /// ranges.
    pub fn new() -> Self {
        Self::with_ignore_max_namespace(true)
    }

    /// Create an empty tree with an explicit max-namespace rule.
    pub fn with_ignore_max_namespace(ignore_max_namespace: bool) -> Self {
        Self {
            leaves: Vec::new(),
            leaf_hashes: Vec::new(),
            ignore_max_namespace,
            _hasher: PhantomData,
        }
    }

    /// Create an empty tree with room for `capacity` leaves.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.leaves.reserve_exact(capacity);
        tree.leaf_hashes.reserve_exact(capacity);
        tree
    }

    /// Whether the maximum namespace is excluded from parent ranges.
    pub fn ignores_max_namespace(&self) -> bool {
        self.ignore_max_namespace
    }

    /// Number of leaves pushed so far.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if no leaf has been pushed.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// The pushed namespaced leaves, in order.
    pub fn leaves(&self) -> &[Vec<u8>] {
        &self.leaves
    }

    /// The leaf hashes, in order.
    pub fn leaf_hashes(&self) -> &[NamespacedHash] {
        &self.leaf_hashes
    }

    /// Namespace of the most recently pushed leaf.
    pub fn last_namespace(&self) -> Option<NamespaceId> {
        self.leaf_hashes.last().map(NamespacedHash::max_namespace)
    }

    /// Append a namespaced leaf.
    ///
    /// Fails if the data is shorter than a namespace or if its namespace is
    /// lower than the previous leaf's. The tree is unchanged on failure.
    pub fn push(&mut self, namespaced_data: &[u8]) -> Result<()> {
        let namespace = NamespaceId::from_prefix(namespaced_data)?;
        if let Some(previous) = self.last_namespace() {
            if namespace < previous {
                return Err(NmtError::OutOfOrder {
                    previous,
                    current: namespace,
                });
            }
        }
        let leaf_hash = NamespacedHash::leaf::<H>(namespace, &namespaced_data[NAMESPACE_SIZE..]);
        self.leaves.push(namespaced_data.to_vec());
        self.leaf_hashes.push(leaf_hash);
        Ok(())
    }

    /// Root over all leaves pushed so far.
    pub fn root(&self) -> NamespacedHash {
        if self.leaf_hashes.is_empty() {
            return NamespacedHash::empty_root::<H>();
        }
        self.subtree_root(0, self.leaf_hashes.len())
    }

    /// Root of the subtree over leaves `[start, end)`. The range must be a
    /// node of the tree shape and non-empty.
    pub(crate) fn subtree_root(&self, start: usize, end: usize) -> NamespacedHash {
        if end - start == 1 {
            return self.leaf_hashes[start];
        }
        let k = split_point(end - start);
        let left = self.subtree_root(start, start + k);
        let right = self.subtree_root(start + k, end);
        NamespacedHash::merge::<H>(&left, &right, self.ignore_max_namespace)
    }

    /// Prove the leaves `[start, end)`.
    pub fn prove_range(&self, start: usize, end: usize) -> Result<RangeProof> {
        if start >= end || end > self.len() {
            return Err(NmtError::InvalidRange {
                start,
                end,
                leaf_count: self.len(),
            });
        }
        let mut nodes = Vec::new();
        self.collect_siblings(0, self.len(), start, end, &mut nodes);
        Ok(RangeProof {
            start: start as u32,
            end: end as u32,
            leaf_count: self.len() as u32,
            nodes,
            ignore_max_namespace: self.ignore_max_namespace,
        })
    }

    /// Prove every leaf carrying `namespace`.
    ///
    /// Leaves are namespace ordered, so they form one contiguous range.
    pub fn prove_namespace(&self, namespace: NamespaceId) -> Result<RangeProof> {
        let start = self
            .leaf_hashes
            .partition_point(|leaf| leaf.min_namespace() < namespace);
        let end = self
            .leaf_hashes
            .partition_point(|leaf| leaf.min_namespace() <= namespace);
        if start == end {
            return Err(NmtError::NamespaceNotFound(namespace));
        }
        self.prove_range(start, end)
    }

    // Push the roots of maximal subtrees outside `[start, end)`, left to right.
    fn collect_siblings(
        &self,
        node_start: usize,
        node_end: usize,
        start: usize,
        end: usize,
        nodes: &mut Vec<NamespacedHash>,
    ) {
        if node_end <= start || node_start >= end {
            nodes.push(self.subtree_root(node_start, node_end));
            return;
        }
        if node_end - node_start == 1 {
            return;
        }
        let k = split_point(node_end - node_start);
        self.collect_siblings(node_start, node_start + k, start, end, nodes);
        self.collect_siblings(node_start + k, node_end, start, end, nodes);
    }
}
