//! Bulk-selection bookkeeping.
//!
//! [`SelectionTracker`] holds the set of row identifiers marked for a bulk
//! action. The set is keyed by [`RowId`], not by position, so it survives
//! re-sorting and paging. It must be reconciled against the live collection
//! whenever the collection is replaced, so identifiers of rows that no longer
//! exist never reach a bulk action.
//!
//! # Example
//!
//! ```
//! use horizon_tabular_core::{RowId, SelectionTracker};
//! use std::collections::HashSet;
//!
//! let mut selection = SelectionTracker::new();
//! selection.select_all(true, (1..=5).map(RowId::from));
//! assert_eq!(selection.len(), 5);
//!
//! // Rows 2 and 4 were deleted elsewhere.
//! let live: HashSet<RowId> = [1, 3, 5].into_iter().map(RowId::from).collect();
//! let pruned = selection.reconcile(&live);
//! assert_eq!(pruned.len(), 2);
//! assert_eq!(selection.len(), 3);
//! ```

use std::collections::HashSet;

use crate::logging::targets;
use crate::row::RowId;
use crate::signal::Signal;

/// Identifiers added to and removed from the selection by one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionChange {
    /// Newly selected identifiers.
    pub selected: Vec<RowId>,
    /// Newly deselected identifiers.
    pub deselected: Vec<RowId>,
}

impl SelectionChange {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.deselected.is_empty()
    }
}

/// The work a bulk action should perform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkPlan {
    /// Live identifiers the action should act on, in selection order.
    pub targets: Vec<RowId>,
    /// Selected identifiers that no longer exist.
    ///
    /// These are treated as already satisfied rather than as failures.
    pub already_satisfied: Vec<RowId>,
}

impl BulkPlan {
    /// Returns `true` if there is nothing to act on.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Manages the set of selected row identifiers.
pub struct SelectionTracker {
    /// Membership.
    selected: HashSet<RowId>,
    /// Selection order, so identifiers are reported deterministically.
    order: Vec<RowId>,

    /// Signal emitted whenever the selection changes.
    pub selection_changed: Signal<SelectionChange>,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTracker {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
            order: Vec::new(),
            selection_changed: Signal::new(),
        }
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Returns the number of selected identifiers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the selected identifiers in selection order.
    pub fn ids(&self) -> &[RowId] {
        &self.order
    }

    /// Returns `true` if every identifier in `ids` is selected and `ids` is
    /// not empty.
    ///
    /// Drives the tri-state "select all" checkbox.
    pub fn all_selected<'a>(&self, ids: impl IntoIterator<Item = &'a RowId>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.selected.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Flips the membership of `id`. Returns the new membership.
    pub fn toggle(&mut self, id: RowId) -> bool {
        let change = if self.selected.remove(&id) {
            self.order.retain(|existing| existing != &id);
            SelectionChange {
                selected: Vec::new(),
                deselected: vec![id],
            }
        } else {
            self.selected.insert(id.clone());
            self.order.push(id.clone());
            SelectionChange {
                selected: vec![id],
                deselected: Vec::new(),
            }
        };

        let now_selected = !change.selected.is_empty();
        self.selection_changed.emit(change);
        now_selected
    }

    /// Implements the "select all" checkbox.
    ///
    /// When `checked`, the selection becomes exactly `ids`, which callers pass
    /// as the whole filtered set rather than the page on screen. When not
    /// checked, the selection is cleared.
    pub fn select_all(&mut self, checked: bool, ids: impl IntoIterator<Item = RowId>) {
        if !checked {
            self.clear();
            return;
        }

        let mut next_order = Vec::new();
        let mut next_set = HashSet::new();
        for id in ids {
            if next_set.insert(id.clone()) {
                next_order.push(id);
            }
        }

        let change = SelectionChange {
            selected: next_order
                .iter()
                .filter(|id| !self.selected.contains(*id))
                .cloned()
                .collect(),
            deselected: self
                .order
                .iter()
                .filter(|id| !next_set.contains(*id))
                .cloned()
                .collect(),
        };

        self.selected = next_set;
        self.order = next_order;

        tracing::debug!(
            target: targets::SELECTION,
            selected = self.order.len(),
            "select all"
        );
        if !change.is_empty() {
            self.selection_changed.emit(change);
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        if self.order.is_empty() {
            return;
        }

        self.selected.clear();
        let deselected = std::mem::take(&mut self.order);
        tracing::debug!(
            target: targets::SELECTION,
            cleared = deselected.len(),
            "selection cleared"
        );
        self.selection_changed.emit(SelectionChange {
            selected: Vec::new(),
            deselected,
        });
    }

    /// Intersects the selection with `live`.
    ///
    /// Returns the pruned identifiers, in selection order.
    pub fn reconcile(&mut self, live: &HashSet<RowId>) -> Vec<RowId> {
        let (kept, pruned): (Vec<RowId>, Vec<RowId>) =
            std::mem::take(&mut self.order)
                .into_iter()
                .partition(|id| live.contains(id));

        self.order = kept;
        if pruned.is_empty() {
            return pruned;
        }

        for id in &pruned {
            self.selected.remove(id);
        }
        tracing::debug!(
            target: targets::SELECTION,
            pruned = pruned.len(),
            remaining = self.order.len(),
            "reconciled selection"
        );
        self.selection_changed.emit(SelectionChange {
            selected: Vec::new(),
            deselected: pruned.clone(),
        });
        pruned
    }

    /// Reconciles against `live`, then describes the bulk action to perform.
    pub fn bulk_plan(&mut self, live: &HashSet<RowId>) -> BulkPlan {
        let already_satisfied = self.reconcile(live);
        BulkPlan {
            targets: self.order.clone(),
            already_satisfied,
        }
    }
}

impl std::fmt::Debug for SelectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("selected", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn ids(range: std::ops::RangeInclusive<i64>) -> Vec<RowId> {
        range.map(RowId::from).collect()
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionTracker::new();
        assert!(selection.toggle(RowId::from(1)));
        assert!(selection.is_selected(&RowId::from(1)));
        assert!(!selection.toggle(RowId::from(1)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_replaces_selection() {
        let mut selection = SelectionTracker::new();
        selection.toggle(RowId::from(99));
        selection.select_all(true, ids(1..=3));

        assert_eq!(selection.ids(), ids(1..=3).as_slice());
        assert!(!selection.is_selected(&RowId::from(99)));
    }

    #[test]
    fn test_select_all_unchecked_clears() {
        let mut selection = SelectionTracker::new();
        selection.select_all(true, ids(1..=3));
        selection.select_all(false, ids(1..=3));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_deduplicates() {
        let mut selection = SelectionTracker::new();
        selection.select_all(true, vec![RowId::from(1), RowId::from(1), RowId::from(2)]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_reconcile_after_external_delete() {
        let mut selection = SelectionTracker::new();
        selection.select_all(true, ids(1..=5));

        let live: HashSet<RowId> = [1, 3, 5].into_iter().map(RowId::from).collect();
        let pruned = selection.reconcile(&live);

        assert_eq!(pruned, vec![RowId::from(2), RowId::from(4)]);
        assert_eq!(selection.ids(), &[RowId::from(1), RowId::from(3), RowId::from(5)]);
    }

    #[test]
    fn test_bulk_plan_reports_missing_as_satisfied() {
        let mut selection = SelectionTracker::new();
        selection.select_all(true, ids(1..=5));

        let live: HashSet<RowId> = [1, 3, 5, 8].into_iter().map(RowId::from).collect();
        let plan = selection.bulk_plan(&live);

        assert_eq!(plan.targets.len(), 3);
        assert_eq!(plan.already_satisfied.len(), 2);
        assert!(!plan.targets.contains(&RowId::from(8)));
    }

    #[test]
    fn test_all_selected() {
        let mut selection = SelectionTracker::new();
        let filtered = ids(1..=3);
        assert!(!selection.all_selected(&filtered));

        selection.select_all(true, filtered.clone());
        assert!(selection.all_selected(&filtered));
        assert!(!selection.all_selected(&Vec::new()));
    }

    #[test]
    fn test_selection_changed_signal() {
        let mut selection = SelectionTracker::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let changes_clone = changes.clone();
        selection.selection_changed.connect(move |change| {
            changes_clone.lock().push(change.clone());
        });

        selection.select_all(true, ids(1..=2));
        selection.toggle(RowId::from(2));
        selection.clear();
        // A second clear is a no-op.
        selection.clear();

        let changes = changes.lock();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].selected.len(), 2);
        assert_eq!(changes[1].deselected, vec![RowId::from(2)]);
        assert_eq!(changes[2].deselected, vec![RowId::from(1)]);
    }
}
