//! Bounded, cursor-based undo/redo timeline.
//!
//! One type serves both history flavours:
//!
//! - **command timeline**: entries are reversible commands, the cursor points
//!   at the last applied one (`None` when everything is undone). Undo is
//!   [`History::rewind`].
//! - **snapshot timeline**: entries are full scene states, seeded with the
//!   initial state by [`History::reset`]; the cursor points at the state on
//!   screen. Undo is [`History::step_back`] and never goes below the first
//!   entry.
//!
//! Recording after an undo discards the redo branch. When the timeline grows
//! past `max_entries` the oldest entry is evicted.

/// Default number of retained entries
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct History<E> {
    entries: Vec<E>,
    cursor: Option<usize>,
    max_entries: usize,
}

impl<E> Default for History<E> {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl<E> History<E> {
    /// Empty history keeping at most `max_entries` (minimum 1)
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&E> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Append `entry` after the cursor, dropping any redo branch
    pub fn record(&mut self, entry: E) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(entry);
        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Drop everything (command timeline after a scene load)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Restart with `initial` as the only entry (snapshot timeline)
    pub fn reset(&mut self, initial: E) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = Some(0);
    }

    pub fn can_rewind(&self) -> bool {
        self.cursor.is_some()
    }

    /// Hand back the entry under the cursor so it can be undone, then move
    /// the cursor one step back
    pub fn rewind(&mut self) -> Option<&mut E> {
        let index = self.cursor?;
        self.cursor = index.checked_sub(1);
        self.entries.get_mut(index)
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    /// Move the cursor back and return the entry now under it. The first
    /// entry is a floor.
    pub fn step_back(&mut self) -> Option<&E> {
        let index = self.cursor.filter(|&i| i > 0)? - 1;
        self.cursor = Some(index);
        self.entries.get(index)
    }

    pub fn can_advance(&self) -> bool {
        self.next_index() < self.entries.len()
    }

    /// Move the cursor forward and return the entry to re-apply
    pub fn advance(&mut self) -> Option<&mut E> {
        let index = self.next_index();
        if index >= self.entries.len() {
            return None;
        }
        self.cursor = Some(index);
        self.entries.get_mut(index)
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |i| i + 1)
    }
}

impl<E: PartialEq> History<E> {
    /// Record unless `entry` equals the entry under the cursor. Returns
    /// whether anything was recorded.
    pub fn record_if_changed(&mut self, entry: E) -> bool {
        if self.current() == Some(&entry) {
            return false;
        }
        self.record(entry);
        true
    }
}
