//! Single-use set of c-vectors for duplicate suppression.

use crate::error::{AstarError, Result};
use crate::hash;
use crate::types::{CElem, Dim};

/// Chain terminator / empty-slot marker.
const EMPTY: u32 = u32::MAX;

/// A set of lattice points keyed by c-vector.
///
/// Built once per probe generation with a fixed capacity: entry storage
/// is a pre-allocated pool and the slot table is the next power of two at
/// least twice the capacity, so inserts never allocate and `clear` is a
/// slot-table wipe. The generator clears it at every shell boundary
/// because shells cannot collide with each other.
pub(crate) struct PointSet {
    dimp: usize,
    capacity: usize,
    mask: usize,
    /// Head entry id per hash slot, `EMPTY` when vacant.
    slots: Vec<u32>,
    /// Chain link per pool entry.
    next: Vec<u32>,
    /// Pool of stored c-vectors, `dimp` elements per entry.
    keys: Vec<CElem>,
    len: usize,
}

impl PointSet {
    pub fn new(dim: Dim, capacity: usize) -> Result<Self> {
        let dimp = dim as usize + 1;
        let slot_count = (capacity * 2).next_power_of_two();

        let mut slots = Vec::new();
        let mut next = Vec::new();
        let mut keys = Vec::new();
        slots
            .try_reserve_exact(slot_count)
            .map_err(|_| AstarError::MemFail)?;
        next.try_reserve_exact(capacity)
            .map_err(|_| AstarError::MemFail)?;
        keys.try_reserve_exact(capacity * dimp)
            .map_err(|_| AstarError::MemFail)?;
        slots.resize(slot_count, EMPTY);

        Ok(PointSet {
            dimp,
            capacity,
            mask: slot_count - 1,
            slots,
            next,
            keys,
            len: 0,
        })
    }

    /// Empty the set, keeping the pool for reuse.
    pub fn clear(&mut self) {
        self.slots.fill(EMPTY);
        self.next.clear();
        self.keys.clear();
        self.len = 0;
    }

    /// Insert a c-vector. Returns `Ok(true)` if it was newly added,
    /// `Ok(false)` if it was already present, and fails with `Unknown`
    /// if the fixed capacity is exceeded.
    pub fn insert(&mut self, c: &[CElem]) -> Result<bool> {
        debug_assert_eq!(c.len(), self.dimp);
        let slot = (hash::hash(c) as usize) & self.mask;

        let mut entry = self.slots[slot];
        while entry != EMPTY {
            let at = entry as usize * self.dimp;
            if &self.keys[at..at + self.dimp] == c {
                return Ok(false);
            }
            entry = self.next[entry as usize];
        }

        if self.len >= self.capacity {
            return Err(AstarError::Unknown);
        }
        let id = self.len as u32;
        self.keys.extend_from_slice(c);
        self.next.push(self.slots[slot]);
        self.slots[slot] = id;
        self.len += 1;
        Ok(true)
    }
}
