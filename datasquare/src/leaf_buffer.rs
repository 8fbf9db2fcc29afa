//! Capacity and ordering gate in front of an axis tree.

use datasquare_nmt::NamespaceId;

use crate::{DEFAULT_MAX_ORIGINAL_WIDTH, Error, Result};

/// Most leaves reserved up front. Larger buffers grow on demand.
pub(crate) const MAX_PREALLOCATED_LEAVES: usize = 2 * DEFAULT_MAX_ORIGINAL_WIDTH;

/// Tracks the namespaces accepted by one axis tree and rejects insertions
/// that would overflow it or break namespace order.
///
/// The checks are split so the caller can run them in the required order:
/// capacity first, then namespace assignment, then ordering. Nothing is
/// recorded until [`accept`](Self::accept) is called.
#[derive(Debug, Clone)]
pub struct OrderedLeafBuffer {
    capacity: usize,
    namespaces: Vec<NamespaceId>,
}

impl OrderedLeafBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            namespaces: Vec::with_capacity(capacity.min(MAX_PREALLOCATED_LEAVES)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.namespaces.len() >= self.capacity
    }

    /// Accepted namespaces in insertion order.
    pub fn namespaces(&self) -> &[NamespaceId] {
        &self.namespaces
    }

    pub fn last_namespace(&self) -> Option<NamespaceId> {
        self.namespaces.last().copied()
    }

    /// Fails once `capacity` leaves have been accepted.
    pub fn check_capacity(&self) -> Result<()> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Fails if `namespace` is lower than the last accepted one.
    pub fn check_order(&self, namespace: NamespaceId, cell: usize) -> Result<()> {
        match self.last_namespace() {
            Some(previous) if namespace < previous => Err(Error::OrderViolation {
                previous,
                current: namespace,
                cell,
            }),
            _ => Ok(()),
        }
    }

    /// Record an inserted leaf. Callers run both checks first.
    pub fn accept(&mut self, namespace: NamespaceId) {
        debug_assert!(!self.is_full());
        self.namespaces.push(namespace);
    }
}
