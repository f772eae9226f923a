//! Row selection state.

use std::collections::BTreeSet;

/// Which filtered indexes are selected.
///
/// Storage is an ordered set so a multi-selection policy can be layered on
/// later. The table view only ever goes through [`select`](Self::select),
/// which keeps at most one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `index` the only selected row.
    ///
    /// Returns the indexes that were selected before, in ascending order.
    /// `index` itself is included if it was already selected.
    pub fn select(&mut self, index: usize) -> Vec<usize> {
        let cleared = self.deselect_all();
        self.selected.insert(index);
        cleared
    }

    /// Deselect a single row. Returns `true` if it was selected.
    pub fn deselect(&mut self, index: usize) -> bool {
        self.selected.remove(&index)
    }

    /// Deselect every row, returning the indexes that were selected.
    pub fn deselect_all(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.selected).into_iter().collect()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Selected indexes in ascending order.
    pub fn selected_indexes(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// The lowest selected index.
    pub fn first_selected(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replaces_previous() {
        let mut selection = SelectionState::new();
        assert!(selection.select(3).is_empty());
        assert_eq!(selection.select(5), vec![3]);
        assert_eq!(selection.selected_indexes(), vec![5]);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_reselect_reports_itself() {
        let mut selection = SelectionState::new();
        selection.select(2);
        assert_eq!(selection.select(2), vec![2]);
        assert!(selection.is_selected(2));
    }

    #[test]
    fn test_deselect() {
        let mut selection = SelectionState::new();
        selection.select(1);
        assert!(!selection.deselect(4));
        assert!(selection.deselect(1));
        assert!(selection.is_empty());
        assert_eq!(selection.first_selected(), None);
    }

    #[test]
    fn test_deselect_all() {
        let mut selection = SelectionState::new();
        selection.select(7);
        assert_eq!(selection.deselect_all(), vec![7]);
        assert!(selection.deselect_all().is_empty());
    }
}
