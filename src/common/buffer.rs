//! Bounded FIFO history used by every stateful indicator.

use serde::Serialize;
use std::collections::VecDeque;

/// Fixed-capacity FIFO. Pushing into a full buffer evicts the oldest entry.
#[derive(Debug, Clone, Serialize)]
pub struct RollingBuffer<T> {
    capacity: usize,
    data: VecDeque<T>,
}

impl<T> RollingBuffer<T> {
    /// Create a buffer holding at most `capacity` entries.
    ///
    /// A zero capacity is bumped to one so the buffer can always hold the
    /// latest value.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            data: VecDeque::with_capacity(capacity.min(4096)),
        }
    }

    /// Append a value, returning the evicted entry if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(value);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&T> {
        self.data.back()
    }

    /// Oldest entry.
    pub fn first(&self) -> Option<&T> {
        self.data.front()
    }

    /// Entry by insertion order, 0 being the oldest retained.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.data.iter()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Clone> RollingBuffer<T> {
    /// Copy of the contents, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}

impl RollingBuffer<f64> {
    pub fn mean(&self) -> f64 {
        super::math::mean(self.data.iter().copied())
    }

    /// Population standard deviation of the contents.
    pub fn std_dev(&self) -> f64 {
        super::math::population_std(self.data.iter().copied())
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }
}
