//! Property-style checks of filter, sort and paginate over seeded random data.

use horizon_tabular_core::{
    FieldValue, FilterEngine, Record, Row, RowId, SortEngine, SortKey, paginate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "harbor", "Depot", "north", "Ledger", "atlas", "Quarry", "meridian", "Orchard", "zenith",
    "basin", "Cobalt", "delta",
];

fn random_records(rng: &mut StdRng, n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let mut record = Record::new(i as i64);
            if !rng.gen_bool(0.15) {
                let word = WORDS[rng.gen_range(0..WORDS.len())];
                record.set("name", format!("{word} {}", rng.gen_range(0..50)));
            }
            if !rng.gen_bool(0.2) {
                let amount: FieldValue = if rng.gen_bool(0.5) {
                    FieldValue::Int(rng.gen_range(-1_000..1_000))
                } else {
                    FieldValue::Float(rng.gen_range(-1_000.0..1_000.0))
                };
                record.set("amount", amount);
            }
            if rng.gen_bool(0.5) {
                record.set("city", WORDS[rng.gen_range(0..WORDS.len())]);
            }
            record
        })
        .collect()
}

fn ids(rows: &[&Record]) -> Vec<RowId> {
    rows.iter().map(|r| r.id()).collect()
}

#[test]
fn filter_returns_matching_subset_in_order() {
    let mut rng = StdRng::seed_from_u64(7);
    let engine = FilterEngine::new(["name", "city"]);

    for _ in 0..50 {
        let n = rng.gen_range(0..60);
        let rows = random_records(&mut rng, n);
        let query = ["ar", "NORTH", "1", "x", "De", " "][rng.gen_range(0..6)];

        let indices = engine.filter_indices(&rows, query);

        assert!(indices.windows(2).all(|w| w[0] < w[1]), "order preserved");
        for &i in &indices {
            assert!(engine.matches(&rows[i], query));
        }
        let rejected = (0..rows.len()).filter(|i| !indices.contains(i));
        for i in rejected {
            assert!(!engine.matches(&rows[i], query));
        }
    }
}

#[test]
fn sort_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let engine = SortEngine::with_locale("en-US");

    for key in ["name", "amount", "city"] {
        let rows = random_records(&mut rng, 80);
        let sort = SortKey::ascending(key);

        let once = engine.sort_indices(&rows, (0..rows.len()).collect(), Some(&sort));
        let twice = engine.sort_indices(&rows, once.clone(), Some(&sort));
        assert_eq!(once, twice, "sorting by {key} twice changed the order");
    }
}

#[test]
fn toggling_direction_reverses_non_null_values_and_keeps_nulls_last() {
    let mut rng = StdRng::seed_from_u64(23);
    let engine = SortEngine::with_locale("en-US");

    for key in ["name", "amount"] {
        let rows = random_records(&mut rng, 80);

        let asc = engine.sort(&rows, Some(&SortKey::ascending(key)));
        let desc = engine.sort(&rows, Some(&SortKey::descending(key)));

        for sorted in [&asc, &desc] {
            let first_null = sorted.iter().position(|r| r.field(key).is_null());
            if let Some(first_null) = first_null {
                assert!(sorted[first_null..].iter().all(|r| r.field(key).is_null()));
            }
        }

        let mut asc_values: Vec<FieldValue> = asc
            .iter()
            .map(|r| r.field(key))
            .filter(|v| !v.is_null())
            .collect();
        let desc_values: Vec<FieldValue> = desc
            .iter()
            .map(|r| r.field(key))
            .filter(|v| !v.is_null())
            .collect();
        asc_values.reverse();
        assert_eq!(asc_values, desc_values);

        // Toggling twice restores the original ordering.
        let back = engine.sort(&rows, Some(&SortKey::descending(key).toggled()));
        assert_eq!(ids(&asc), ids(&back));
    }
}

#[test]
fn pages_concatenate_to_input() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..100 {
        let len = rng.gen_range(0..120);
        let page_size = rng.gen_range(1..25);
        let items: Vec<usize> = (0..len).collect();

        let first = paginate(&items, page_size, 1);
        assert_eq!(first.total_pages, len.div_ceil(page_size).max(1));

        let joined: Vec<usize> = (1..=first.total_pages)
            .flat_map(|p| paginate(&items, page_size, p).items)
            .collect();
        assert_eq!(joined, items);

        let wild = paginate(&items, page_size, rng.gen_range(0..500));
        assert!(wild.current_page >= 1 && wild.current_page <= wild.total_pages);
    }
}
