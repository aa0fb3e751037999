//! Property tests for the browsing invariants.

use std::collections::HashSet;

use proptest::prelude::*;

use catalog_engine::{BrowseEngine, PartitionExpansion, ViewBody, ViewMode, filter, page_window};
use catalog_model::{FacetSelection, FacetSpec, FieldValue, ListingSchema, Record, RecordId};

const WORDS: [&str; 6] = ["Math", "history", "MATHEMATICS", "Law", "biology", "art"];
const REGIONS: [&str; 3] = ["North", "South", "East"];

fn schema(page_size: usize) -> ListingSchema {
    ListingSchema::new("workers")
        .with_search_fields(&["name", "skill"])
        .with_facet(FacetSpec::ascending("region"))
        .with_facet(FacetSpec::descending("year"))
        .with_partition_field("category")
        .with_page_size(page_size)
}

fn arb_record(index: usize) -> impl Strategy<Value = Record> {
    (
        0..WORDS.len(),
        0..WORDS.len(),
        0..REGIONS.len(),
        2020i64..2024,
        proptest::option::of(0u8..4),
    )
        .prop_map(move |(name, skill, region, year, category)| {
            let record = Record::new(RecordId::new(format!("r{index}")).unwrap())
                .with_field("name", WORDS[name])
                .with_field("skill", WORDS[skill])
                .with_field("region", REGIONS[region])
                .with_field("year", year);
            match category {
                Some(c) => record.with_field("category", format!("cat-{c}")),
                None => record,
            }
        })
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    (0usize..40).prop_flat_map(|len| (0..len).map(arb_record).collect::<Vec<_>>())
}

fn arb_query() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("math".to_string()),
        Just("LAW".to_string()),
        Just("o".to_string()),
        Just("zzz".to_string()),
    ]
}

fn arb_selection() -> impl Strategy<Value = FacetSelection> {
    (
        proptest::option::of(0..REGIONS.len()),
        proptest::option::of(2020i64..2024),
    )
        .prop_map(|(region, year)| {
            let mut selection = FacetSelection::new();
            selection.set("region", region.map(|r| FieldValue::text(REGIONS[r])));
            selection.set("year", year.map(FieldValue::Integer));
            selection
        })
}

#[derive(Debug, Clone)]
enum Op {
    Search(String),
    Clear,
    Region(Option<usize>),
    Next,
    Prev,
    GoTo(usize),
    Mode(bool),
    Reload(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_query().prop_map(Op::Search),
        Just(Op::Clear),
        proptest::option::of(0..REGIONS.len()).prop_map(Op::Region),
        Just(Op::Next),
        Just(Op::Prev),
        (0usize..12).prop_map(Op::GoTo),
        any::<bool>().prop_map(Op::Mode),
        (0usize..40).prop_map(Op::Reload),
    ]
}

proptest! {
    #[test]
    fn filtered_records_satisfy_search_and_facets(
        records in arb_records(),
        query in arb_query(),
        selection in arb_selection(),
    ) {
        let schema = schema(10);
        let set = filter::compute(&records, &schema, &query, &selection);
        let needle = query.to_lowercase();
        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        for record in set.records(&records) {
            prop_assert!(ids.contains(record.id.as_str()));
            prop_assert!(selection.matches(record));
            if !needle.is_empty() {
                let hit = ["name", "skill"].iter().any(|f| {
                    record
                        .get(f)
                        .is_some_and(|v| v.search_text().contains(&needle))
                });
                prop_assert!(hit);
            }
        }
        // Nothing that passes the predicate is left out.
        let expected = records
            .iter()
            .filter(|r| selection.matches(r))
            .filter(|r| {
                needle.is_empty()
                    || ["name", "skill"].iter().any(|f| {
                        r.get(f).is_some_and(|v| v.search_text().contains(&needle))
                    })
            })
            .count();
        prop_assert_eq!(set.len(), expected);
    }

    #[test]
    fn adding_a_facet_never_grows_the_result(
        records in arb_records(),
        query in arb_query(),
        region in 0..REGIONS.len(),
    ) {
        let schema = schema(10);
        let loose = filter::compute(&records, &schema, &query, &FacetSelection::new());
        let mut selection = FacetSelection::new();
        selection.set("region", Some(FieldValue::text(REGIONS[region])));
        let tight = filter::compute(&records, &schema, &query, &selection);
        prop_assert!(tight.len() <= loose.len());
        let loose: HashSet<usize> = loose.indices().iter().copied().collect();
        prop_assert!(tight.indices().iter().all(|i| loose.contains(i)));
    }

    #[test]
    fn partitions_cover_the_filtered_set_exactly_once(
        records in arb_records(),
        query in arb_query(),
    ) {
        let mut engine = BrowseEngine::with_records(schema(10), records).unwrap();
        engine.on_keystroke(&query, std::time::Instant::now());
        engine.flush_search();
        let view = engine.view();
        let ViewBody::Grouped { partitions } = &view.body else {
            return Err(TestCaseError::fail("expected grouped body"));
        };
        let total: usize = partitions.iter().map(|p| p.count).sum();
        prop_assert_eq!(total, view.total_filtered);
        let mut seen = HashSet::new();
        for partition in partitions {
            for record in &partition.records {
                prop_assert!(seen.insert(record.id.clone()));
            }
        }
        prop_assert_eq!(seen.len(), view.total_filtered);
        let keys: Vec<&str> = partitions.iter().map(|p| p.key.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn current_page_stays_in_bounds(
        records in arb_records(),
        page_size in 1usize..8,
        ops in proptest::collection::vec(arb_op(), 0..30),
    ) {
        let pool = records.clone();
        let mut engine = BrowseEngine::with_records(schema(page_size), records).unwrap();
        engine.set_view_mode(ViewMode::Flat);
        for op in ops {
            let before = engine.current_page();
            match op {
                Op::Search(text) => {
                    engine.on_keystroke(&text, std::time::Instant::now());
                    engine.flush_search();
                    prop_assert_eq!(engine.current_page(), 1);
                }
                Op::Clear => {
                    engine.on_clear();
                    prop_assert_eq!(engine.current_page(), 1);
                }
                Op::Region(region) => {
                    let changed = engine
                        .select_facet("region", region.map(|r| FieldValue::text(REGIONS[r])))
                        .unwrap();
                    if changed {
                        prop_assert_eq!(engine.current_page(), 1);
                    } else {
                        prop_assert_eq!(engine.current_page(), before);
                    }
                }
                Op::Next => { engine.next_page(); }
                Op::Prev => { engine.prev_page(); }
                Op::GoTo(page) => {
                    if !engine.go_to_page(page) {
                        prop_assert_eq!(engine.current_page(), before);
                    }
                }
                Op::Mode(grouped) => {
                    let mode = if grouped { ViewMode::Grouped } else { ViewMode::Flat };
                    engine.set_view_mode(mode);
                }
                Op::Reload(len) => {
                    engine.finish_load(pool.iter().take(len).cloned().collect());
                }
            }
            let view = engine.view();
            let expected_pages = match engine.mode() {
                ViewMode::Flat => view.total_filtered.div_ceil(page_size).max(1),
                ViewMode::Grouped => 1,
            };
            prop_assert_eq!(view.total_pages, expected_pages);
            prop_assert!(view.current_page >= 1 && view.current_page <= view.total_pages);
            if engine.mode() == ViewMode::Flat {
                prop_assert!(view.body.visible_count() <= page_size);
            }
        }
    }

    #[test]
    fn page_window_is_contiguous_and_in_range(
        total in 1usize..60,
        current in 0usize..70,
        max_buttons in 0usize..9,
    ) {
        let window = page_window(current, total, max_buttons);
        prop_assert_eq!(window.len(), max_buttons.min(total));
        for pair in window.windows(2) {
            prop_assert_eq!(pair[1], pair[0] + 1);
        }
        if let (Some(first), Some(last)) = (window.first(), window.last()) {
            prop_assert!(*first >= 1);
            prop_assert!(*last <= total);
            prop_assert!(window.contains(&current.clamp(1, total)));
        }
    }

    #[test]
    fn toggle_all_twice_restores_uniform_state(
        keys in proptest::collection::btree_set("[a-d]{1,2}", 1..6),
        collapsed in any::<bool>(),
    ) {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut expansion = PartitionExpansion::new();
        // Bring everything into a uniform explicit state first.
        expansion.toggle_all(keys.iter().copied());
        if collapsed {
            expansion.toggle_all(keys.iter().copied());
        }
        let before: Vec<bool> = keys.iter().map(|k| expansion.is_expanded(k)).collect();
        let first = expansion.toggle_all(keys.iter().copied());
        let second = expansion.toggle_all(keys.iter().copied());
        prop_assert_ne!(first, second);
        let after: Vec<bool> = keys.iter().map(|k| expansion.is_expanded(k)).collect();
        prop_assert_eq!(before, after);
    }
}
