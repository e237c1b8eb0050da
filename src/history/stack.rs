use std::collections::VecDeque;

/// Default number of undo steps retained per stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo stack of whole-state copies.
///
/// Callers push the *current* state before mutating it; undo and redo swap the current state with
/// the top of the opposite stack.
#[derive(Clone, Debug)]
pub struct History<T> {
    past: VecDeque<T>,
    future: Vec<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    /// Empty history keeping at most `limit` undo steps (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Push `current` as an undo step and invalidate redo.
    pub fn record(&mut self, current: T) {
        self.past.push_back(current);
        if self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Pop the last undo step, parking `current` for redo. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let prev = self.past.pop_back()?;
        self.future.push(current);
        Some(prev)
    }

    /// Pop the last redo step, parking `current` for undo. `None` when there is nothing to redo.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    pub fn clear_future(&mut self) {
        self.future.clear();
    }

    pub fn reset(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/stack.rs"]
mod tests;
