//! # Ring Topology
//!
//! Assigns every process a dense identifier in `[0, N)` and computes its
//! single successor on the ring: `successor(id) = (id + 1) % N`. Over all N
//! processes the successor relation forms exactly one N-cycle; that structural
//! invariant is established here once and never re-verified by the processes
//! themselves.

use crate::error::{ElectionError, Result};

/// Fewer than three members would collapse the protocol's absorption and
/// self-return rules into two-node degeneracies.
pub const MIN_RING_SIZE: u32 = 3;

/// The ring's structure: identifiers and the successor relation.
///
/// Purely structural, no runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingTopology {
    size: u32,
}

impl RingTopology {
    /// Build a ring of `size` processes.
    ///
    /// # Returns
    /// - `Ok(RingTopology)`: a valid ring of at least three members
    /// - `Err(ElectionError::Configuration)`: `size` is below the minimum
    pub fn new(size: u32) -> Result<Self> {
        if size < MIN_RING_SIZE {
            return Err(ElectionError::Configuration(format!(
                "ring requires at least {} processes, got {}",
                MIN_RING_SIZE, size
            )));
        }
        Ok(Self { size })
    }

    /// Number of processes on the ring.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// All process identifiers, in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = u32> {
        0..self.size
    }

    /// The next process clockwise from `id`.
    pub fn successor(&self, id: u32) -> u32 {
        (id + 1) % self.size
    }

    /// Whether `id` is a valid identifier on this ring.
    pub fn contains(&self, id: u32) -> bool {
        id < self.size
    }
}
