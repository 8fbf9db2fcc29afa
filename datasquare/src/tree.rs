//! The accumulator seam between the square builder and axis commitments.

use crate::{Result, SquareIndex};

/// A commitment over one row or column of the extended square.
///
/// The builder pushes the `2N` shares of an axis in position order and then
/// reads the root. It refuses trees whose capacity is not `2N`.
pub trait Tree {
    /// Digest produced by the tree.
    type Root: AsRef<[u8]> + Clone + Send + Sync;

    /// Number of shares the tree is sized for, the extended width of the
    /// square it belongs to.
    fn capacity(&self) -> usize;

    /// Insert `share` found at `index`.
    fn push(&mut self, share: &[u8], index: SquareIndex) -> Result<()>;

    /// Root over everything pushed so far.
    fn root(&self) -> Self::Root;
}

/// Produces a fresh, empty [`Tree`] for each axis of a square.
///
/// The builder calls [`construct`](Self::construct) once per row and once
/// per column, possibly from several threads at a time.
pub trait TreeConstructor: Sync {
    type Tree: Tree;

    fn construct(&self) -> Self::Tree;
}

impl<F, T> TreeConstructor for F
where
    F: Fn() -> T + Sync,
    T: Tree,
{
    type Tree = T;

    fn construct(&self) -> T {
        self()
    }
}
