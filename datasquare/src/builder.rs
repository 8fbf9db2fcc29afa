//! Erasure-codes an original square and commits to every row and column.

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{
    Codec, ErasuredNmtConstructor, Error, ExtendedDataSquare, PARITY_SHARES_NAMESPACE,
    ReedSolomonCodec, Result, Share, SquareConfig, SquareIndex, Tree, TreeConstructor,
};
use datasquare_nmt::NamespacedHash;

/// Root type produced by the trees of a [`TreeConstructor`].
pub type RootOf<T> = <<T as TreeConstructor>::Tree as Tree>::Root;

/// Builds [`ExtendedDataSquare`]s from `N x N` original shares.
///
/// The original data forms quadrant Q0. Q1 extends each row of Q0, Q2 each
/// column of Q0 and Q3 each row of Q2. Every one of the `2N` rows and `2N`
/// columns then gets its own tree from the constructor.
#[derive(Debug, Clone)]
pub struct ExtendedDataSquareBuilder<C, T> {
    codec: C,
    constructor: T,
    config: SquareConfig,
}

impl<C: Codec, T: TreeConstructor> ExtendedDataSquareBuilder<C, T> {
    pub fn new(codec: C, constructor: T) -> Self {
        Self {
            codec,
            constructor,
            config: SquareConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SquareConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SquareConfig {
        &self.config
    }

    /// Extend `shares`, given row-major, and compute the axis roots.
    ///
    /// The first failure of any encoding or push aborts the build; no
    /// partial square is returned.
    pub fn build(&self, shares: Vec<Share>) -> Result<ExtendedDataSquare<RootOf<T>>> {
        self.try_build(shares).inspect_err(|e| {
            warn!(error = %e, codec = self.codec.name(), "extended data square build aborted");
        })
    }

    fn try_build(&self, shares: Vec<Share>) -> Result<ExtendedDataSquare<RootOf<T>>> {
        let n = self.validate(&shares)?;
        debug!(
            original_width = n,
            extended_width = 2 * n,
            codec = self.codec.name(),
            parallel = self.config.parallel,
            "building extended data square"
        );

        let q1 = map_indices(n, self.config.parallel, |row| {
            self.encode_axis(shares[row * n..(row + 1) * n].iter())
        })?;
        let q2_cols = map_indices(n, self.config.parallel, |col| {
            self.encode_axis(shares.iter().skip(col).step_by(n))
        })?;
        let q3 = map_indices(n, self.config.parallel, |row| {
            self.encode_axis(q2_cols.iter().map(|col| &col[row]))
        })?;

        let width = 2 * n;
        let mut extended = Vec::with_capacity(width * width);
        for (row, parity) in shares.chunks(n).zip(&q1) {
            extended.extend_from_slice(row);
            extended.extend_from_slice(parity);
        }
        for (row, parity) in q3.iter().enumerate() {
            extended.extend(q2_cols.iter().map(|col| col[row].clone()));
            extended.extend_from_slice(parity);
        }

        let (row_roots, col_roots) =
            compute_roots(&extended, width, &self.constructor, self.config.parallel)?;
        debug!(
            original_width = n,
            roots = row_roots.len() + col_roots.len(),
            "extended data square complete"
        );
        Ok(ExtendedDataSquare::new(n, extended, row_roots, col_roots))
    }

    /// Check the original square and return its width.
    fn validate(&self, shares: &[Share]) -> Result<usize> {
        let n = original_width_of(shares.len())?;
        let max = self.codec.max_chunks().min(self.config.max_original_width);
        if n > max {
            return Err(Error::TooManyShares { width: n, max });
        }
        for (position, share) in shares.iter().enumerate() {
            if share.len() != self.config.share_size {
                return Err(Error::UnevenShares {
                    position,
                    expected: self.config.share_size,
                    found: share.len(),
                });
            }
            if share.namespace() == PARITY_SHARES_NAMESPACE {
                return Err(Error::ReservedNamespace);
            }
        }
        Ok(n)
    }

    fn encode_axis<'a>(&self, data: impl Iterator<Item = &'a Share>) -> Result<Vec<Share>> {
        let data: Vec<&[u8]> = data.map(Share::as_bytes).collect();
        let parity = self.codec.encode(&data)?;
        if parity.len() != data.len() {
            return Err(Error::Codec(format!(
                "{} returned {} parity shares for {} data shares",
                self.codec.name(),
                parity.len(),
                data.len()
            )));
        }
        parity
            .into_iter()
            .map(|bytes| {
                if bytes.len() != self.config.share_size {
                    return Err(Error::Codec(format!(
                        "{} returned a {} byte share, expected {}",
                        self.codec.name(),
                        bytes.len(),
                        self.config.share_size
                    )));
                }
                Share::new(bytes)
            })
            .collect()
    }
}

/// Extend `shares` with an explicit codec and tree constructor, using the
/// default configuration.
pub fn compute_extended_data_square<C, T>(
    shares: Vec<Share>,
    codec: C,
    constructor: T,
) -> Result<ExtendedDataSquare<RootOf<T>>>
where
    C: Codec,
    T: TreeConstructor,
{
    ExtendedDataSquareBuilder::new(codec, constructor).build(shares)
}

/// Extend `shares` with Reed-Solomon and SHA-256 erasured namespaced trees.
pub fn extend_square(shares: Vec<Share>) -> Result<ExtendedDataSquare<NamespacedHash>> {
    let n = original_width_of(shares.len())?;
    compute_extended_data_square(shares, ReedSolomonCodec::new(), ErasuredNmtConstructor::new(n))
}

/// Width of a non-empty square of `count` shares.
pub(crate) fn original_width_of(count: usize) -> Result<usize> {
    let n = count.isqrt();
    if n == 0 || n * n != count {
        return Err(Error::InvalidSquareSize { shares: count });
    }
    Ok(n)
}

/// Row and column roots of a row-major `width x width` square.
pub(crate) fn compute_roots<T: TreeConstructor>(
    shares: &[Share],
    width: usize,
    constructor: &T,
    parallel: bool,
) -> Result<(Vec<RootOf<T>>, Vec<RootOf<T>>)> {
    let row_roots = map_indices(width, parallel, |row| {
        trace!(row, "committing row");
        commit_axis(constructor, width, row, shares[row * width..(row + 1) * width].iter())
    })?;
    let col_roots = map_indices(width, parallel, |col| {
        trace!(col, "committing column");
        commit_axis(constructor, width, col, shares.iter().skip(col).step_by(width))
    })?;
    Ok((row_roots, col_roots))
}

/// Root of one axis. The tree must be sized for exactly `width` shares,
/// otherwise it would classify original and parity cells by the wrong
/// square.
fn commit_axis<'a, T: TreeConstructor>(
    constructor: &T,
    width: usize,
    axis: usize,
    cells: impl Iterator<Item = &'a Share>,
) -> Result<RootOf<T>> {
    let mut tree = constructor.construct();
    if tree.capacity() != width {
        return Err(Error::TreeSizeMismatch {
            expected: width,
            capacity: tree.capacity(),
        });
    }
    let mut pushed = 0;
    for (cell, share) in cells.enumerate() {
        tree.push(share.as_bytes(), SquareIndex::new(axis, cell))?;
        pushed += 1;
    }
    debug_assert_eq!(pushed, width);
    Ok(tree.root())
}

/// Run `f` over `0..count`, on the rayon pool when `parallel` is set.
///
/// Collection stops at the first error.
fn map_indices<R, F>(count: usize, parallel: bool, f: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> Result<R> + Sync + Send,
{
    if parallel {
        (0..count).into_par_iter().map(f).collect()
    } else {
        (0..count).map(f).collect()
    }
}
