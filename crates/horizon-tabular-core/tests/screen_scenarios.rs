//! End-to-end scenarios of a list screen driven through `TableEngine`.

use std::collections::HashSet;

use horizon_tabular_core::{
    ColumnDescriptor, Record, Row, RowId, SelectAllScope, SelectionTracker, SortKey, TableConfig,
    TableEngine,
};

fn accounts(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            Record::new(i as i64)
                .with_field("owner", format!("Owner {i:03}"))
                .with_field("status", if i % 3 == 0 { "closed" } else { "open" })
                .with_field("balance", (i as i64) * 100)
        })
        .collect()
}

fn config() -> TableConfig {
    TableConfig::new(["owner", "status"])
        .with_page_size(10)
        .with_locale("en-US")
        .with_columns(vec![
            ColumnDescriptor::new("owner", "Owner"),
            ColumnDescriptor::new("status", "Status"),
            ColumnDescriptor::new("balance", "Balance"),
        ])
}

#[test]
fn twenty_three_filtered_rows_make_three_pages() {
    // 34 rows, of which 23 are "open".
    let mut engine = TableEngine::new(accounts(34), config()).unwrap();
    engine.set_query("open");
    assert_eq!(engine.filtered_len(), 23);

    let mut sizes = Vec::new();
    engine.set_page(1);
    loop {
        sizes.push(engine.page().rows.len());
        if !engine.next_page() {
            break;
        }
    }

    assert_eq!(sizes, vec![10, 10, 3]);
    assert_eq!(engine.page().total_pages, 3);
}

#[test]
fn select_all_then_snapshot_covers_whole_filtered_set() {
    let mut engine = TableEngine::new(accounts(34), config()).unwrap();
    engine.set_query("open");
    engine.select_all(true);

    assert_eq!(engine.page().rows.len(), 10);
    assert_eq!(engine.selection().len(), 23);
    assert_eq!(engine.snapshot().len(), 23);
}

#[test]
fn current_page_scope_is_an_explicit_override() {
    let config = config().with_select_all_scope(SelectAllScope::CurrentPage);
    let mut engine = TableEngine::new(accounts(35), config).unwrap();
    engine.select_all(true);
    assert_eq!(engine.selection().len(), 10);
}

#[test]
fn external_delete_prunes_selection_before_bulk_action() {
    let mut engine = TableEngine::new(accounts(5), config()).unwrap();
    engine.select_all(true);
    assert_eq!(engine.selection().len(), 5);

    // Rows 2 and 5 are deleted by another user; the next fetch omits them.
    let refreshed: Vec<Record> = accounts(5)
        .into_iter()
        .filter(|r| ![RowId::from(2), RowId::from(5)].contains(&r.id()))
        .collect();
    engine.replace_collection(refreshed);

    assert_eq!(engine.selection().len(), 3);
    let plan = engine.bulk_plan();
    assert_eq!(
        plan.targets,
        vec![RowId::from(1), RowId::from(3), RowId::from(4)]
    );
}

#[test]
fn bulk_plan_without_refresh_treats_missing_ids_as_satisfied() {
    let mut tracker = SelectionTracker::new();
    tracker.select_all(true, (1..=5).map(RowId::from));

    let live: HashSet<RowId> = [1, 2, 3].into_iter().map(RowId::from).collect();
    let plan = tracker.bulk_plan(&live);

    assert_eq!(plan.targets.len(), 3);
    assert_eq!(plan.already_satisfied, vec![RowId::from(4), RowId::from(5)]);
}

#[test]
fn ui_state_survives_refresh() {
    let config = config().with_default_sort(SortKey::descending("balance"));
    let mut engine = TableEngine::new(accounts(30), config).unwrap();
    engine.set_query("open");
    engine.set_page_size(5);
    engine.set_page(2);

    engine.replace_collection(accounts(40));

    assert_eq!(engine.query(), "open");
    assert_eq!(engine.sort_key(), Some(&SortKey::descending("balance")));
    assert_eq!(engine.window().page_size(), 5);
    assert_eq!(engine.window().current_page(), 2);
    assert_eq!(engine.filtered_ids()[0], RowId::from(40));
}
