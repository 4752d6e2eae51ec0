//! Chat history ring buffer
//!
//! Keeps the last 50 completed exchanges, oldest first, for index-based navigation.

mod cursor;

pub use cursor::HistoryCursor;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Maximum number of retained exchanges.
pub const HISTORY_CAPACITY: usize = 50;

/// One recorded request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub pattern: String,
    pub model: String,
    pub input: String,
    pub output: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry stamped with the current time.
    pub fn new(
        pattern: impl Into<String>,
        model: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            model: model.into(),
            input: input.into(),
            output: output.into(),
            timestamp: Utc::now(),
        }
    }
}

/// History lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Fixed-capacity FIFO log of exchanges.
///
/// Internally synchronized; share it as `Arc<HistoryBuffer>`.
pub struct HistoryBuffer {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer holding at most [`HISTORY_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Creates an empty buffer with a custom capacity (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Adds an entry at the tail, evicting from the head while over capacity.
    pub fn append(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Returns the entry at `index` (0 = oldest retained).
    pub fn get(&self, index: usize) -> Result<HistoryEntry, HistoryError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(index)
            .cloned()
            .ok_or(HistoryError::OutOfRange {
                index,
                len: entries.len(),
            })
    }

    /// Number of entries currently stored.
    pub fn count(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent entry, if any.
    pub fn latest(&self) -> Option<HistoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(i: usize) -> HistoryEntry {
        HistoryEntry::new("summarize", "gpt-4o", format!("input-{}", i), format!("output-{}", i))
    }

    #[test]
    fn test_new_creates_empty_history() {
        let history = HistoryBuffer::new();
        assert_eq!(history.count(), 0);
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 50);
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_append_adds_entry() {
        let history = HistoryBuffer::new();
        history.append(entry(0));

        assert_eq!(history.count(), 1);
        let stored = history.get(0).unwrap();
        assert_eq!(stored.input, "input-0");
        assert_eq!(stored.pattern, "summarize");
    }

    #[test]
    fn test_ring_buffer_eviction_fifo() {
        let history = HistoryBuffer::new();
        for i in 0..55 {
            history.append(entry(i));
        }

        assert_eq!(history.count(), 50);
        // 0-4 were evicted
        assert_eq!(history.get(0).unwrap().input, "input-5");
        assert_eq!(history.get(49).unwrap().input, "input-54");
        assert_eq!(history.latest().unwrap().input, "input-54");
    }

    #[test]
    fn test_get_out_of_range_on_empty() {
        let history = HistoryBuffer::new();
        assert_eq!(
            history.get(0),
            Err(HistoryError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_get_out_of_range_past_end() {
        let history = HistoryBuffer::new();
        history.append(entry(0));
        history.append(entry(1));
        assert!(history.get(1).is_ok());
        assert!(matches!(
            history.get(2),
            Err(HistoryError::OutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_entries_returns_insertion_order() {
        let history = HistoryBuffer::new();
        for i in (0..5).rev() {
            history.append(entry(i));
        }
        let entries = history.entries();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].input, "input-4");
        assert_eq!(entries[4].input, "input-0");
    }

    #[test]
    fn test_clear_empties_buffer() {
        let history = HistoryBuffer::new();
        history.append(entry(0));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let history = HistoryBuffer::with_capacity(0);
        history.append(entry(0));
        history.append(entry(1));
        assert_eq!(history.count(), 1);
        assert_eq!(history.get(0).unwrap().input, "input-1");
    }

    #[test]
    fn test_error_display() {
        let err = HistoryError::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "history index 7 out of range (len 3)");
    }

    proptest! {
        #[test]
        fn prop_count_is_min_of_calls_and_capacity(calls in 0usize..200) {
            let history = HistoryBuffer::new();
            for i in 0..calls {
                history.append(entry(i));
            }
            prop_assert_eq!(history.count(), calls.min(HISTORY_CAPACITY));
            if calls > 0 {
                let oldest = calls.saturating_sub(HISTORY_CAPACITY);
                prop_assert_eq!(history.get(0).unwrap().input, format!("input-{}", oldest));
            }
        }

        #[test]
        fn prop_get_rejects_every_index_past_count(calls in 0usize..80, extra in 0usize..1000) {
            let history = HistoryBuffer::new();
            for i in 0..calls {
                history.append(entry(i));
            }
            let index = history.count() + extra;
            let is_out_of_range = matches!(history.get(index), Err(HistoryError::OutOfRange { .. }));
            prop_assert!(is_out_of_range);
        }
    }
}
