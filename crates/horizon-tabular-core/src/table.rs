//! Table engine: filter, sort, paginate and select for one list screen.
//!
//! [`TableEngine`] composes the leaf engines over a [`Collection`]:
//!
//! ```text
//! Collection ─► FilterEngine ─► SortEngine ─┬─► PageWindow  (screen)
//!                                           └─► TableSnapshot (export)
//! ```
//!
//! The filtered and sorted order is memoized on the collection generation,
//! the query text and the sort key. Paging is a cheap slice on top of it.
//! Query, sort, page size and column visibility survive a collection refresh;
//! the page is reset to 1 when the query text changes and re-clamped after
//! every recomputation.

use std::sync::Arc;

use crate::collection::Collection;
use crate::column::ColumnSet;
use crate::config::{SelectAllScope, TableConfig};
use crate::error::Result;
use crate::filter::FilterEngine;
use crate::logging::{PerfSpan, span_names, targets};
use crate::paginate::PageWindow;
use crate::row::{Row, RowId};
use crate::selection::{BulkPlan, SelectionTracker};
use crate::signal::Signal;
use crate::sort::{Collation, SortDirection, SortEngine, SortKey};

/// The rows on the current page plus the window describing them.
#[derive(Debug)]
pub struct PageView<'a, R> {
    /// Rows on the current page, in display order.
    pub rows: Vec<&'a R>,
    /// Clamped 1-based page number.
    pub current_page: usize,
    /// Total number of pages, at least one.
    pub total_pages: usize,
    /// Number of rows passing the filter.
    pub total_items: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl<R: Row> PageView<'_, R> {
    /// Returns the identifiers of the rows on the page.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id()).collect()
    }
}

/// An immutable capture of the filtered and sorted view.
///
/// Taken at invocation time and handed to the export pipeline, so replacing
/// the collection afterwards does not affect an export in flight. Cloning is
/// cheap.
pub struct TableSnapshot<R> {
    collection: Collection<R>,
    order: Arc<[usize]>,
    columns: ColumnSet,
}

impl<R> TableSnapshot<R> {
    /// Creates a snapshot of `rows` in their given order.
    pub fn from_rows(rows: Vec<R>, columns: impl Into<ColumnSet>) -> Self {
        let order: Vec<usize> = (0..rows.len()).collect();
        Self {
            collection: Collection::new(rows),
            order: order.into(),
            columns: columns.into(),
        }
    }

    /// Returns the number of rows in the snapshot.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the snapshot holds no rows.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the columns captured with the snapshot.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Returns the generation of the collection the snapshot was taken from.
    pub fn generation(&self) -> u64 {
        self.collection.generation()
    }

    /// Returns the rows in view order.
    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.order.iter().filter_map(|&i| self.collection.get(i))
    }
}

impl<R> Clone for TableSnapshot<R> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            order: Arc::clone(&self.order),
            columns: self.columns.clone(),
        }
    }
}

impl<R> std::fmt::Debug for TableSnapshot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSnapshot")
            .field("generation", &self.collection.generation())
            .field("rows", &self.order.len())
            .field("columns", &self.columns.len())
            .finish()
    }
}

/// Memo key of the filtered and sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewKey {
    generation: u64,
    query: String,
    sort: Option<SortKey>,
}

/// The data engine behind one list screen.
pub struct TableEngine<R> {
    collection: Collection<R>,
    filter: FilterEngine,
    sorter: SortEngine,
    query: String,
    sort: Option<SortKey>,
    window: PageWindow,
    columns: ColumnSet,
    select_all_scope: SelectAllScope,
    selection: SelectionTracker,
    /// Memoized filtered and sorted positions into the collection.
    order: Arc<[usize]>,
    /// Inputs `order` was computed from; `None` until the first computation.
    order_key: Option<ViewKey>,

    /// Emitted after the filtered or sorted order changed.
    pub layout_changed: Signal<()>,
    /// Emitted after the page window changed.
    pub page_changed: Signal<PageWindow>,
}

impl<R: Row> TableEngine<R> {
    /// Creates an engine over `rows`.
    ///
    /// Fails if `config` does not validate.
    pub fn new(rows: impl Into<Collection<R>>, config: TableConfig) -> Result<Self> {
        config.validate()?;

        let collation = match &config.locale {
            Some(locale) => Collation::new(locale),
            None => Collation::system(),
        };

        let mut engine = Self {
            collection: rows.into(),
            filter: FilterEngine::new(config.filter_fields),
            sorter: SortEngine::new(collation),
            query: String::new(),
            sort: config.default_sort,
            window: PageWindow::new(config.page_size, 0),
            columns: config.columns,
            select_all_scope: config.select_all_scope,
            selection: SelectionTracker::new(),
            order: Arc::from(Vec::new()),
            order_key: None,
            layout_changed: Signal::new(),
            page_changed: Signal::new(),
        };
        engine.recompute();
        Ok(engine)
    }

    // =========================================================================
    // Collection
    // =========================================================================

    /// Returns the live collection.
    pub fn collection(&self) -> &Collection<R> {
        &self.collection
    }

    /// Swaps in a new collection.
    ///
    /// The selection is reconciled against the new rows and the page is
    /// re-clamped. Returns the identifiers pruned from the selection.
    pub fn replace_collection(&mut self, rows: impl Into<Collection<R>>) -> Vec<RowId> {
        self.collection = rows.into();
        tracing::debug!(
            target: targets::TABLE,
            rows = self.collection.len(),
            generation = self.collection.generation(),
            "collection replaced"
        );

        let pruned = self.selection.reconcile(&self.collection.id_set());
        self.recompute();
        pruned
    }

    // =========================================================================
    // Filter and sort
    // =========================================================================

    /// Returns the current filter query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sets the filter query.
    ///
    /// The page is reset to 1 whenever the text changes.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.update_window(|w| w.set_current_page(1));
        self.recompute();
    }

    /// Returns the fields the filter inspects.
    pub fn filter_fields(&self) -> &[String] {
        self.filter.fields()
    }

    /// Returns the active sort key.
    pub fn sort_key(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    /// Sets or clears the active sort key.
    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        if sort == self.sort {
            return;
        }
        self.sort = sort;
        self.recompute();
    }

    /// Header-click sorting: the same key flips direction, a new key starts
    /// ascending.
    pub fn toggle_sort(&mut self, key: &str) -> SortDirection {
        let next = match &self.sort {
            Some(current) if current.key == key => current.toggled(),
            _ => SortKey::ascending(key),
        };
        let direction = next.direction;
        self.set_sort(Some(next));
        direction
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Returns the page window.
    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Sets the page size and re-clamps the current page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.update_window(|w| w.set_page_size(page_size));
    }

    /// Moves to `page`, clamped into range.
    pub fn set_page(&mut self, page: usize) {
        self.update_window(|w| w.set_current_page(page));
    }

    /// Moves to the next page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        let mut moved = false;
        self.update_window(|w| moved = w.next());
        moved
    }

    /// Moves to the previous page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        let mut moved = false;
        self.update_window(|w| moved = w.previous());
        moved
    }

    fn update_window(&mut self, change: impl FnOnce(&mut PageWindow)) {
        let before = self.window;
        change(&mut self.window);
        if self.window != before {
            self.page_changed.emit(self.window);
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Returns the rows on the current page.
    pub fn page(&self) -> PageView<'_, R> {
        let order = self.order();
        let rows = order[self.window.range()]
            .iter()
            .filter_map(|&i| self.collection.get(i))
            .collect();

        PageView {
            rows,
            current_page: self.window.current_page(),
            total_pages: self.window.total_pages(),
            total_items: self.window.total_items(),
            page_size: self.window.page_size(),
        }
    }

    /// Returns every row passing the filter, in sorted order.
    pub fn filtered_rows(&self) -> Vec<&R> {
        self.order()
            .iter()
            .filter_map(|&i| self.collection.get(i))
            .collect()
    }

    /// Returns the identifiers of every row passing the filter, in sorted
    /// order.
    pub fn filtered_ids(&self) -> Vec<RowId> {
        self.filtered_rows().into_iter().map(Row::id).collect()
    }

    /// Returns the number of rows passing the filter.
    pub fn filtered_len(&self) -> usize {
        self.order().len()
    }

    /// Captures the filtered and sorted view for export.
    pub fn snapshot(&self) -> TableSnapshot<R> {
        TableSnapshot {
            collection: self.collection.clone(),
            order: Arc::clone(self.order()),
            columns: self.columns.clone(),
        }
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Returns the columns.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Returns the columns for editing (e.g. toggling visibility).
    pub fn columns_mut(&mut self) -> &mut ColumnSet {
        &mut self.columns
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns the selection.
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Returns the "select all" scope.
    pub fn select_all_scope(&self) -> SelectAllScope {
        self.select_all_scope
    }

    /// Flips the selection of one row.
    pub fn toggle_selected(&mut self, id: impl Into<RowId>) -> bool {
        self.selection.toggle(id.into())
    }

    /// The "select all" checkbox.
    ///
    /// Selects every filtered row, or only the current page when the screen
    /// is configured with [`SelectAllScope::CurrentPage`].
    pub fn select_all(&mut self, checked: bool) {
        let ids = self.select_all_ids();
        self.selection.select_all(checked, ids);
    }

    /// Returns `true` when every row in the "select all" scope is selected.
    pub fn is_all_selected(&self) -> bool {
        self.selection.all_selected(&self.select_all_ids())
    }

    fn select_all_ids(&self) -> Vec<RowId> {
        match self.select_all_scope {
            SelectAllScope::FilteredSet => self.filtered_ids(),
            SelectAllScope::CurrentPage => self.page().ids(),
        }
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Reconciles the selection with the live collection and describes the
    /// bulk action to perform.
    pub fn bulk_plan(&mut self) -> BulkPlan {
        self.selection.bulk_plan(&self.collection.id_set())
    }

    // =========================================================================
    // Recomputation
    // =========================================================================

    fn view_key(&self) -> ViewKey {
        ViewKey {
            generation: self.collection.generation(),
            query: self.query.clone(),
            sort: self.sort.clone(),
        }
    }

    fn order(&self) -> &Arc<[usize]> {
        &self.order
    }

    /// Brings the memoized order and the page window up to date.
    fn recompute(&mut self) {
        let key = self.view_key();
        if self.order_key.as_ref() == Some(&key) {
            tracing::trace!(target: targets::TABLE, "view cache hit");
            return;
        }

        let order: Arc<[usize]> = {
            let _span = PerfSpan::new(span_names::RECOMPUTE);
            let rows = self.collection.rows();
            let filtered = self.filter.filter_indices(rows, &self.query);
            self.sorter
                .sort_indices(rows, filtered, self.sort.as_ref())
                .into()
        };

        tracing::debug!(
            target: targets::TABLE,
            generation = key.generation,
            query = %key.query,
            sort = ?key.sort,
            rows = order.len(),
            "recomputed view"
        );

        let total = order.len();
        self.order = order;
        self.order_key = Some(key);
        self.update_window(|w| w.set_total_items(total));
        self.layout_changed.emit(());
    }
}

impl<R> std::fmt::Debug for TableEngine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableEngine")
            .field("collection", &self.collection)
            .field("query", &self.query)
            .field("sort", &self.sort)
            .field("window", &self.window)
            .field("selected", &self.selection.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnDescriptor;
    use crate::row::Record;
    use parking_lot::Mutex;

    fn records(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::new(i as i64)
                    .with_field("name", format!("Account {i:02}"))
                    .with_field("region", if i % 2 == 0 { "North" } else { "South" })
            })
            .collect()
    }

    fn engine(n: usize) -> TableEngine<Record> {
        let config = TableConfig::new(["name", "region"])
            .with_page_size(10)
            .with_locale("en-US")
            .with_columns(vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("region", "Region"),
            ]);
        TableEngine::new(records(n), config).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TableConfig::new(["name"]).with_page_size(0);
        assert!(TableEngine::new(records(3), config).is_err());
    }

    #[test]
    fn test_pages_of_twenty_three() {
        let mut engine = engine(23);
        assert_eq!(engine.page().rows.len(), 10);
        assert_eq!(engine.page().total_pages, 3);

        engine.set_page(3);
        assert_eq!(engine.page().rows.len(), 3);
        assert!(!engine.next_page());
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut engine = engine(30);
        engine.set_page(3);
        engine.set_query("account");
        assert_eq!(engine.window().current_page(), 1);

        // Same text does not reset.
        engine.set_page(2);
        engine.set_query("account");
        assert_eq!(engine.window().current_page(), 2);
    }

    #[test]
    fn test_filter_shrink_reclamps_page() {
        let mut engine = engine(30);
        engine.set_page(3);
        engine.replace_collection(records(12));
        assert_eq!(engine.window().current_page(), 2);
        assert_eq!(engine.page().rows.len(), 2);
    }

    #[test]
    fn test_toggle_sort() {
        let mut engine = engine(5);
        assert_eq!(engine.toggle_sort("name"), SortDirection::Ascending);
        assert_eq!(engine.toggle_sort("name"), SortDirection::Descending);
        assert_eq!(engine.filtered_ids()[0], RowId::from(5));
        assert_eq!(engine.toggle_sort("region"), SortDirection::Ascending);
    }

    #[test]
    fn test_select_all_covers_filtered_set_not_page() {
        let mut engine = engine(23);
        engine.select_all(true);
        assert_eq!(engine.selection().len(), 23);
        assert!(engine.is_all_selected());

        engine.set_query("north");
        engine.select_all(true);
        assert_eq!(engine.selection().len(), 11);
    }

    #[test]
    fn test_select_all_current_page_override() {
        let config = TableConfig::new(["name"])
            .with_page_size(10)
            .with_select_all_scope(SelectAllScope::CurrentPage);
        let mut engine = TableEngine::new(records(23), config).unwrap();
        engine.set_page(3);
        engine.select_all(true);
        assert_eq!(engine.selection().len(), 3);
    }

    #[test]
    fn test_replace_collection_reconciles_selection() {
        let mut engine = engine(5);
        engine.select_all(true);

        let survivors: Vec<Record> = records(5)
            .into_iter()
            .filter(|r| r.id() != RowId::from(2) && r.id() != RowId::from(4))
            .collect();
        let pruned = engine.replace_collection(survivors);

        assert_eq!(pruned.len(), 2);
        let plan = engine.bulk_plan();
        assert_eq!(plan.targets.len(), 3);
        assert!(plan.already_satisfied.is_empty());
    }

    #[test]
    fn test_memoized_view_is_reused() {
        let mut engine = engine(10);
        let layouts = Arc::new(Mutex::new(0));
        let layouts_clone = layouts.clone();
        engine.layout_changed.connect(move |_| *layouts_clone.lock() += 1);

        engine.set_query("south");
        engine.set_sort(Some(SortKey::descending("name")));
        engine.set_sort(Some(SortKey::descending("name")));
        engine.set_page_size(3);

        assert_eq!(*layouts.lock(), 2);
    }

    #[test]
    fn test_snapshot_is_isolated_from_refresh() {
        let mut engine = engine(4);
        engine.set_query("north");
        let snapshot = engine.snapshot();

        engine.replace_collection(records(1));
        assert_eq!(snapshot.len(), 2);
        let ids: Vec<RowId> = snapshot.rows().map(Row::id).collect();
        assert_eq!(ids, vec![RowId::from(2), RowId::from(4)]);
    }
}
