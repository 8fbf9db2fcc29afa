//! The extended data square and its square-wide commitment.

use sha2::{Digest, Sha256};

use crate::{
    Axis, Error, Result, Share, SquareConfig, Tree, TreeConstructor,
    builder::{compute_roots, original_width_of},
};

/// A `2N x 2N` erasure-coded square with one root per row and per column.
///
/// Quadrant Q0 (top left) holds the original data. Q1 and Q2 extend its
/// rows and columns, Q3 extends the rows of Q2. Read-only once built.
#[derive(Debug, Clone)]
pub struct ExtendedDataSquare<R> {
    original_width: usize,
    shares: Vec<Share>,
    row_roots: Vec<R>,
    col_roots: Vec<R>,
}

impl<R> ExtendedDataSquare<R> {
    pub(crate) fn new(
        original_width: usize,
        shares: Vec<Share>,
        row_roots: Vec<R>,
        col_roots: Vec<R>,
    ) -> Self {
        debug_assert_eq!(shares.len(), 4 * original_width * original_width);
        debug_assert_eq!(row_roots.len(), 2 * original_width);
        debug_assert_eq!(col_roots.len(), 2 * original_width);
        Self {
            original_width,
            shares,
            row_roots,
            col_roots,
        }
    }

    /// Take an already extended `2N x 2N` square, row-major, and recompute
    /// its roots with trees from `constructor`. The codec is not run, so the
    /// parity quadrants are committed to as given. Share size, width limit
    /// and parallelism come from `config`, as for a build.
    pub fn import<T>(shares: Vec<Share>, constructor: &T, config: &SquareConfig) -> Result<Self>
    where
        T: TreeConstructor,
        T::Tree: Tree<Root = R>,
    {
        let width = original_width_of(shares.len())?;
        if width % 2 != 0 {
            return Err(Error::InvalidSquareSize {
                shares: shares.len(),
            });
        }
        if width / 2 > config.max_original_width {
            return Err(Error::TooManyShares {
                width: width / 2,
                max: config.max_original_width,
            });
        }
        if let Some(position) = shares.iter().position(|s| s.len() != config.share_size) {
            return Err(Error::UnevenShares {
                position,
                expected: config.share_size,
                found: shares[position].len(),
            });
        }

        let (row_roots, col_roots) = compute_roots(&shares, width, constructor, config.parallel)?;
        Ok(Self::new(width / 2, shares, row_roots, col_roots))
    }

    /// Side of the extended square.
    pub fn width(&self) -> usize {
        2 * self.original_width
    }

    /// Side of the original square.
    pub fn original_width(&self) -> usize {
        self.original_width
    }

    /// Share at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Share> {
        let width = self.width();
        if row >= width || col >= width {
            return None;
        }
        self.shares.get(row * width + col)
    }

    /// The shares of row `index`.
    pub fn row(&self, index: usize) -> Option<&[Share]> {
        let width = self.width();
        if index >= width {
            return None;
        }
        Some(&self.shares[index * width..(index + 1) * width])
    }

    /// The shares of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> Option<Vec<&Share>> {
        let width = self.width();
        if index >= width {
            return None;
        }
        Some(self.shares.iter().skip(index).step_by(width).collect())
    }

    /// The original `N x N` shares, row-major.
    pub fn original_shares(&self) -> Vec<&Share> {
        let width = self.width();
        (0..self.original_width)
            .flat_map(|row| &self.shares[row * width..row * width + self.original_width])
            .collect()
    }

    /// All shares, row-major.
    pub fn flattened(&self) -> &[Share] {
        &self.shares
    }

    pub fn row_roots(&self) -> &[R] {
        &self.row_roots
    }

    pub fn col_roots(&self) -> &[R] {
        &self.col_roots
    }

    /// Roots along `axis`.
    pub fn roots(&self, axis: Axis) -> &[R] {
        match axis {
            Axis::Row => &self.row_roots,
            Axis::Col => &self.col_roots,
        }
    }
}

impl<R: AsRef<[u8]>> ExtendedDataSquare<R> {
    /// Commitment to the whole square: the RFC 6962 SHA-256 Merkle root over
    /// the row roots followed by the column roots.
    pub fn data_root(&self) -> [u8; 32] {
        let leaves: Vec<&[u8]> = self
            .row_roots
            .iter()
            .chain(&self.col_roots)
            .map(AsRef::as_ref)
            .collect();
        merkle_root(&leaves)
    }
}

fn merkle_root(leaves: &[&[u8]]) -> [u8; 32] {
    match leaves.len() {
        0 => Sha256::digest(b"").into(),
        1 => Sha256::new()
            .chain_update([0x00u8])
            .chain_update(leaves[0])
            .finalize()
            .into(),
        n => {
            let k = n.next_power_of_two() / 2;
            let left = merkle_root(&leaves[..k]);
            let right = merkle_root(&leaves[k..]);
            Sha256::new()
                .chain_update([0x01u8])
                .chain_update(left)
                .chain_update(right)
                .finalize()
                .into()
        }
    }
}
