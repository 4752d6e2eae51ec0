//! Previous/next navigation over a [`HistoryBuffer`].

use super::{HistoryBuffer, HistoryEntry};

/// Tracks the entry currently shown to the user.
///
/// The cursor stores only an index; it re-reads the buffer on every move, so
/// evictions between moves are tolerated by clamping.
#[derive(Debug, Clone, Default)]
pub struct HistoryCursor {
    current: Option<usize>,
}

impl HistoryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point at the newest entry (done after every recorded exchange).
    pub fn reset_to_latest(&mut self, buffer: &HistoryBuffer) {
        self.current = buffer.count().checked_sub(1);
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }

    pub fn has_next(&self, buffer: &HistoryBuffer) -> bool {
        match self.current {
            Some(i) => i + 1 < buffer.count(),
            None => buffer.count() > 0,
        }
    }

    /// Move one entry back; `None` at the oldest entry.
    pub fn previous(&mut self, buffer: &HistoryBuffer) -> Option<HistoryEntry> {
        let len = buffer.count();
        let current = self.current?.min(len.checked_sub(1)?);
        if current == 0 {
            self.current = Some(0);
            return None;
        }
        self.current = Some(current - 1);
        buffer.get(current - 1).ok()
    }

    /// Move one entry forward; `None` at the newest entry.
    pub fn next(&mut self, buffer: &HistoryBuffer) -> Option<HistoryEntry> {
        let len = buffer.count();
        let target = match self.current {
            Some(i) => i + 1,
            None => 0,
        };
        if target >= len {
            return None;
        }
        self.current = Some(target);
        buffer.get(target).ok()
    }
}
