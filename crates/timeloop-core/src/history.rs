//! Bounded per-actor history of snapshots.
//!
//! [`HistoryBuffer`] is an oldest-first queue with FIFO eviction on
//! record and LIFO removal on rewind. Unlike a fixed ring, it shrinks
//! as history is consumed, so a rewind that runs the buffer dry leaves
//! it empty rather than wrapping back into overwritten slots.

use std::collections::vec_deque::{self, VecDeque};

/// Bounded, ordered sequence of snapshots owned by one actor.
///
/// `len() <= max_frames` holds after every [`record`](Self::record)
/// call. The bound is passed per call rather than stored so that the
/// controller remains the single owner of the session-wide depth.
#[derive(Clone, Debug)]
pub struct HistoryBuffer<T> {
    entries: VecDeque<T>,
}

impl<T> HistoryBuffer<T> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Create an empty buffer with room for `capacity` snapshots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append `snapshot` as the newest entry, then evict from the front
    /// until at most `max_frames` entries remain.
    ///
    /// Returns the number of evicted entries.
    pub fn record(&mut self, snapshot: T, max_frames: usize) -> usize {
        self.entries.push_back(snapshot);
        let mut evicted = 0;
        while self.entries.len() > max_frames {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Remove and return the most recently recorded snapshot.
    ///
    /// Returns `None` when the history is exhausted.
    pub fn pop_latest(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    /// The most recently recorded snapshot, without removing it.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// The oldest retained snapshot.
    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Number of snapshots currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is exhausted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate oldest-first.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.entries.iter()
    }

    /// Drop all retained snapshots.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for HistoryBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a HistoryBuffer<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
