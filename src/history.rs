//! Bounded bar history store
//!
//! A fixed-capacity ring buffer of finalized bars, indexed newest-first.
//! All engine statistics are read through this store.

use crate::Bar;

/// Chronologically ordered ring buffer of OHLC snapshots
///
/// `append` is O(1); once full, the oldest bar is evicted silently.
/// Stored bars are never reordered or mutated.
#[derive(Debug, Clone)]
pub struct BarHistory {
    slots: Vec<Option<Bar>>,
    /// Next write position, modulo capacity
    head: usize,
    len: usize,
}

impl BarHistory {
    /// Create a store holding at most `capacity` bars
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        BarHistory {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
        }
    }

    /// Append the newest finalized bar, evicting the oldest when full
    pub fn append(&mut self, bar: Bar) {
        self.slots[self.head] = Some(bar);
        self.head = (self.head + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    /// Bar `index_from_newest` positions behind the latest bar
    ///
    /// `get(0)` is the most recent bar; `None` when the requested bar
    /// was never stored or already evicted.
    pub fn get(&self, index_from_newest: usize) -> Option<&Bar> {
        if index_from_newest >= self.len {
            return None;
        }
        let capacity = self.slots.len();
        let slot = (self.head + capacity - 1 - index_from_newest) % capacity;
        self.slots[slot].as_ref()
    }

    /// Number of bars currently stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of bars retained
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
