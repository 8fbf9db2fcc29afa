//! Namespace assignment for leaves of an erasured tree.

use datasquare_nmt::{NAMESPACE_SIZE, NamespaceId};

use crate::{Error, Result, SquareHalf};

/// Namespace given to every parity share: the maximum 8-byte namespace.
///
/// Roots depend on this value. It must be strictly greater than any
/// namespace an original share may carry.
pub const PARITY_SHARES_NAMESPACE: NamespaceId = NamespaceId([0xff; NAMESPACE_SIZE]);

/// Namespace under which `share` is inserted into its axis tree.
///
/// Original shares keep their embedded prefix and may not claim the parity
/// namespace. Parity shares always get [`PARITY_SHARES_NAMESPACE`], whatever
/// bytes the codec produced.
pub fn assign_namespace(share: &[u8], half: SquareHalf) -> Result<NamespaceId> {
    if share.len() < NAMESPACE_SIZE {
        return Err(Error::ShareTooShort { len: share.len() });
    }
    match half {
        SquareHalf::Parity => Ok(PARITY_SHARES_NAMESPACE),
        SquareHalf::Original => {
            let namespace = NamespaceId::from_prefix(share)?;
            if namespace == PARITY_SHARES_NAMESPACE {
                return Err(Error::ReservedNamespace);
            }
            Ok(namespace)
        }
    }
}
