//! Range and namespace inclusion proofs.
//!
//! A `RangeProof` proves that a contiguous run of leaves `[start, end)`
//! belongs to a tree with a given root. It carries the roots of the maximal
//! subtrees that lie completely outside the range, ordered left to right.
//! Verification needs no tree: the root is rebuilt from the proved leaves and
//! those sibling nodes.

use bincode::{Decode, Encode};

use crate::{
    MerkleHasher, NAMESPACE_SIZE, NamespaceId, NamespacedHash, NmtError, Result,
    hash::split_point,
};

/// Upper bound on sibling nodes. A range proof over a tree of `2^32`
/// leaves needs at most 64.
const MAX_PROOF_NODES: usize = 64;

/// An inclusion proof for the leaves `[start, end)` of a namespaced Merkle
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct RangeProof {
    /// First proved leaf.
    pub start: u32,
    /// One past the last proved leaf.
    pub end: u32,
    /// Number of leaves in the tree.
    pub leaf_count: u32,
    /// Roots of the subtrees outside the range, left to right.
    pub nodes: Vec<NamespacedHash>,
    /// Max-namespace rule of the tree the proof was generated from.
    pub ignore_max_namespace: bool,
}

/// Sibling nodes consumed during root reconstruction, split by side.
#[derive(Default)]
struct Siblings {
    left: Vec<NamespacedHash>,
    right: Vec<NamespacedHash>,
}

impl RangeProof {
    /// Verify the proof for namespaced `leaves` against `root`, under the
    /// max-namespace rule recorded in the proof.
    pub fn verify<H: MerkleHasher, L: AsRef<[u8]>>(
        &self,
        root: &NamespacedHash,
        leaves: &[L],
    ) -> Result<()> {
        let (computed, _) = self.rebuild::<H, L>(leaves, self.ignore_max_namespace)?;
        if &computed != root {
            return Err(NmtError::InvalidProof(format!(
                "root mismatch: expected {}, got {}",
                root, computed
            )));
        }
        Ok(())
    }

    /// Verify that `leaves` are the complete content of `namespace`.
    ///
    /// On top of [`verify`](Self::verify), checks that every proved leaf
    /// carries `namespace` and that no sibling outside the range can hold
    /// it.
    pub fn verify_namespace<H: MerkleHasher, L: AsRef<[u8]>>(
        &self,
        root: &NamespacedHash,
        namespace: NamespaceId,
        leaves: &[L],
    ) -> Result<()> {
        for leaf in leaves {
            let leaf_namespace = NamespaceId::from_prefix(leaf.as_ref())?;
            if leaf_namespace != namespace {
                return Err(NmtError::InvalidProof(format!(
                    "leaf namespace {} does not match {}",
                    leaf_namespace, namespace
                )));
            }
        }
        let (computed, siblings) = self.rebuild::<H, L>(leaves, self.ignore_max_namespace)?;
        if &computed != root {
            return Err(NmtError::InvalidProof(format!(
                "root mismatch: expected {}, got {}",
                root, computed
            )));
        }
        if siblings.left.iter().any(|node| node.max_namespace() >= namespace) {
            return Err(NmtError::InvalidProof(format!(
                "a left sibling may contain namespace {}",
                namespace
            )));
        }
        if siblings.right.iter().any(|node| node.min_namespace() <= namespace) {
            return Err(NmtError::InvalidProof(format!(
                "a right sibling may contain namespace {}",
                namespace
            )));
        }
        Ok(())
    }

    /// Rebuild the root from the proved leaves without comparing it.
    pub fn compute_root<H: MerkleHasher, L: AsRef<[u8]>>(
        &self,
        leaves: &[L],
        ignore_max_namespace: bool,
    ) -> Result<NamespacedHash> {
        self.rebuild::<H, L>(leaves, ignore_max_namespace)
            .map(|(root, _)| root)
    }

    fn rebuild<H: MerkleHasher, L: AsRef<[u8]>>(
        &self,
        leaves: &[L],
        ignore_max_namespace: bool,
    ) -> Result<(NamespacedHash, Siblings)> {
        let (start, end, leaf_count) = (
            self.start as usize,
            self.end as usize,
            self.leaf_count as usize,
        );
        if start >= end || end > leaf_count {
            return Err(NmtError::InvalidProof(format!(
                "invalid range [{}, {}) for {} leaves",
                start, end, leaf_count
            )));
        }
        if leaves.len() != end - start {
            return Err(NmtError::InvalidProof(format!(
                "expected {} leaves, got {}",
                end - start,
                leaves.len()
            )));
        }
        if self.nodes.len() > MAX_PROOF_NODES {
            return Err(NmtError::InvalidProof(format!(
                "proof contains too many nodes (max {})",
                MAX_PROOF_NODES
            )));
        }

        let mut leaf_hashes = Vec::with_capacity(leaves.len());
        let mut previous: Option<NamespaceId> = None;
        for leaf in leaves {
            let data = leaf.as_ref();
            let namespace = NamespaceId::from_prefix(data)?;
            if previous.is_some_and(|p| namespace < p) {
                return Err(NmtError::InvalidProof(
                    "proved leaves are not namespace ordered".into(),
                ));
            }
            previous = Some(namespace);
            leaf_hashes.push(NamespacedHash::leaf::<H>(namespace, &data[NAMESPACE_SIZE..]));
        }

        let mut rebuild = Rebuild::<H> {
            start,
            end,
            leaf_hashes: &leaf_hashes,
            nodes: self.nodes.iter(),
            siblings: Siblings::default(),
            ignore_max_namespace,
            _hasher: core::marker::PhantomData,
        };
        let root = rebuild.node(0, leaf_count)?;
        if rebuild.nodes.next().is_some() {
            return Err(NmtError::InvalidProof("unused proof nodes".into()));
        }
        Ok((root, rebuild.siblings))
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| NmtError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 }>();
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| NmtError::InvalidProof(format!("decode error: {}", e)))?;
        Ok(proof)
    }
}

struct Rebuild<'a, H> {
    start: usize,
    end: usize,
    leaf_hashes: &'a [NamespacedHash],
    nodes: core::slice::Iter<'a, NamespacedHash>,
    siblings: Siblings,
    ignore_max_namespace: bool,
    _hasher: core::marker::PhantomData<H>,
}

impl<H: MerkleHasher> Rebuild<'_, H> {
    fn node(&mut self, node_start: usize, node_end: usize) -> Result<NamespacedHash> {
        if node_end <= self.start || node_start >= self.end {
            let node = *self
                .nodes
                .next()
                .ok_or_else(|| NmtError::InvalidProof("missing proof node".into()))?;
            if node_end <= self.start {
                self.siblings.left.push(node);
            } else {
                self.siblings.right.push(node);
            }
            return Ok(node);
        }
        if node_end - node_start == 1 {
            return Ok(self.leaf_hashes[node_start - self.start]);
        }
        let k = split_point(node_end - node_start);
        let left = self.node(node_start, node_start + k)?;
        let right = self.node(node_start + k, node_end)?;
        if left.max_namespace() > right.min_namespace() {
            return Err(NmtError::InvalidProof(format!(
                "nodes out of namespace order: {} > {}",
                left.max_namespace(),
                right.min_namespace()
            )));
        }
        Ok(NamespacedHash::merge::<H>(
            &left,
            &right,
            self.ignore_max_namespace,
        ))
    }
}
