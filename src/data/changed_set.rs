//! Insertion-ordered set of dirty entity indices.
//!
//! A [`ChangedSet`] pairs a [`BitSet`] (membership) with a `Vec<usize>`
//! (order of first insertion). Both halves are only mutated together, so an
//! index is in the list exactly when its bit is set and never twice.

use super::bit_set::BitSet;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshWaveError;

#[derive(Clone, Debug, Default)]
pub struct ChangedSet {
    member: BitSet,
    order: Vec<usize>,
}

impl ChangedSet {
    /// Empty set over the index space `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            member: BitSet::with_len(capacity),
            order: Vec::new(),
        }
    }

    /// Size of the index space.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.member.len()
    }

    /// Mark `i` dirty. Returns `true` if it was not already marked.
    #[inline]
    pub fn mark(&mut self, i: usize) -> bool {
        if self.member.set(i) {
            self.order.push(i);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.member.test(i)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Marked indices in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Take every marked index (insertion order) and leave the set empty.
    ///
    /// Only the bits that were set are cleared, so draining a sparse set over
    /// a large index space stays proportional to the number of entries.
    pub fn drain(&mut self) -> Vec<usize> {
        let out = std::mem::take(&mut self.order);
        for &i in &out {
            self.member.unset(i);
        }
        out
    }

    /// Forget every marked index.
    pub fn clear(&mut self) {
        let _ = self.drain();
    }
}

impl DebugInvariants for ChangedSet {
    fn validate_invariants(&self) -> Result<(), MeshWaveError> {
        if self.member.count() != self.order.len() {
            return Err(MeshWaveError::InvariantViolation(format!(
                "changed set holds {} bits but {} listed indices",
                self.member.count(),
                self.order.len()
            )));
        }
        if let Some(&i) = self.order.iter().find(|&&i| !self.member.test(i)) {
            return Err(MeshWaveError::InvariantViolation(format!(
                "index {i} listed but not marked"
            )));
        }
        Ok(())
    }
}
