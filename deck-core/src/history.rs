//! Snapshot-based undo/redo for editing sessions.

use std::collections::VecDeque;

use crate::presentation::Presentation;

/// Default number of undo steps kept.
pub const DEFAULT_DEPTH: usize = 100;

/// Bounded undo and redo stacks of whole-presentation snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Presentation>,
    redo: Vec<Presentation>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl History {
    /// Create a history keeping at most `depth` undo steps.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Record the state before a mutation. Clears the redo stack.
    pub fn record(&mut self, before: &Presentation) {
        if self.undo.len() == self.depth {
            self.undo.pop_front();
        }
        self.undo.push_back(before.clone());
        self.redo.clear();
    }

    /// Step back: returns the state to restore, stashing `current` for redo.
    pub fn undo(&mut self, current: &Presentation) -> Option<Presentation> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Step forward: returns the state to restore, stashing `current` for undo.
    pub fn redo(&mut self, current: &Presentation) -> Option<Presentation> {
        let next = self.redo.pop()?;
        self.undo.push_back(current.clone());
        Some(next)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_is_bounded() {
        let mut history = History::new(2);
        for i in 0..5 {
            history.record(&Presentation::new(i.to_string(), ""));
        }
        let current = Presentation::new("now", "");
        assert_eq!(history.undo(&current).map(|p| p.id), Some("4".to_string()));
        assert_eq!(history.undo(&current).map(|p| p.id), Some("3".to_string()));
        assert!(history.undo(&current).is_none());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(&Presentation::new("a", ""));
        let _ = history.undo(&Presentation::new("b", ""));
        assert!(history.can_redo());
        history.record(&Presentation::new("c", ""));
        assert!(!history.can_redo());
    }
}
