//! Fixed-length position history for line-strip rendering

use flurry_core::Vec3;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Default number of positions kept per trail
pub const DEFAULT_TRAIL_LENGTH: usize = 8;

/// Ring of the most recent particle positions, oldest first
///
/// The length never changes after creation: every push discards the oldest
/// entry.
#[derive(Clone, Debug)]
pub struct Trail {
    positions: VecDeque<Vec3>,
}

impl Trail {
    /// Create a trail with every slot set to `initial`
    pub fn new(initial: Vec3, length: NonZeroUsize) -> Self {
        Self {
            positions: std::iter::repeat(initial).take(length.get()).collect(),
        }
    }

    /// Record a new position, dropping the oldest
    pub fn push(&mut self, position: Vec3) {
        self.positions.pop_front();
        self.positions.push_back(position);
    }

    /// Number of stored positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; a trail holds at least one position
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions from oldest to newest
    pub fn positions(&self) -> impl ExactSizeIterator<Item = &Vec3> + '_ {
        self.positions.iter()
    }

    pub fn newest(&self) -> Option<Vec3> {
        self.positions.back().copied()
    }

    pub fn oldest(&self) -> Option<Vec3> {
        self.positions.front().copied()
    }
}
