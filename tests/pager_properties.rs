//! Property-based tests for the pager and the value renderer.
//!
//! Invariants covered:
//! 1. Every key in a page matches the active filter (or the filter is empty)
//! 2. A page segment never exceeds the page size
//! 3. Draining via successive extends yields a strictly increasing,
//!    duplicate-free sequence equal to the filtered key set
//! 4. The renderer is total, deterministic, and control-free

use std::collections::BTreeSet;

use ldbv::pager::{FilterSpec, Pager};
use ldbv::render::render_value;
use ldbv::store::MemStore;
use proptest::prelude::*;

fn store_from(keys: &BTreeSet<String>) -> MemStore {
    MemStore::from_pairs(keys.iter().map(|k| (k.clone(), format!("value-of-{k}"))))
}

/// Drive the pager to exhaustion under one filter epoch.
fn drain(store: &mut MemStore, page_size: usize, filter: &str) -> Vec<String> {
    let mut pager = Pager::new(page_size);
    pager.reset(store, FilterSpec::new(filter)).unwrap();
    while pager.has_more() {
        if !pager.extend(store).unwrap() {
            break;
        }
    }
    pager.keys().iter().map(|k| k.display()).collect()
}

proptest! {
    #[test]
    fn every_listed_key_matches_the_filter(
        keys in prop::collection::btree_set("[a-zA-Z0-9]{1,8}", 0..40),
        needle in "[a-zA-Z0-9]{0,3}",
        page_size in 1usize..6,
    ) {
        let mut store = store_from(&keys);
        let listed = drain(&mut store, page_size, &needle);
        let needle_lower = needle.to_lowercase();
        for key in &listed {
            prop_assert!(
                needle.is_empty() || key.to_lowercase().contains(&needle_lower),
                "key {key:?} does not contain filter {needle:?}"
            );
        }
    }

    #[test]
    fn first_page_never_exceeds_page_size(
        keys in prop::collection::btree_set("[a-z]{1,6}", 0..40),
        page_size in 1usize..8,
    ) {
        let mut store = store_from(&keys);
        let mut pager = Pager::new(page_size);
        pager.reset(&mut store, FilterSpec::new("")).unwrap();
        prop_assert!(pager.len() <= page_size);
        // Page size equality holds whenever more matches exist beyond it.
        if keys.len() > page_size {
            prop_assert_eq!(pager.len(), page_size);
        }
    }

    #[test]
    fn drained_pages_equal_the_filtered_key_set_in_order(
        keys in prop::collection::btree_set("[a-zA-Z0-9]{1,8}", 0..40),
        needle in "[a-z0-9]{0,2}",
        page_size in 1usize..6,
    ) {
        let mut store = store_from(&keys);
        let listed = drain(&mut store, page_size, &needle);

        // Strictly increasing (byte order on the original keys), no dups.
        for window in listed.windows(2) {
            prop_assert!(window[0] < window[1], "not strictly increasing: {listed:?}");
        }

        let needle_lower = needle.to_lowercase();
        let expected: Vec<String> = keys
            .iter()
            .filter(|k| needle.is_empty() || k.to_lowercase().contains(&needle_lower))
            .cloned()
            .collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn render_never_panics_and_is_deterministic(value in prop::collection::vec(any::<u8>(), 0..256)) {
        let first = render_value(&value);
        let second = render_value(&value);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn render_output_is_free_of_control_characters(value in prop::collection::vec(any::<u8>(), 0..256)) {
        let rendered = render_value(&value);
        // Pretty-printed JSON is the one place newlines are legitimate.
        prop_assert!(rendered.chars().all(|c| !c.is_control() || c == '\n'));
    }

    #[test]
    fn printable_ascii_passes_through_unchanged(text in "[ -~]{1,64}") {
        // JSON-shaped inputs get pretty-printed instead; exclude them.
        prop_assume!(serde_json::from_str::<serde_json::Value>(&text).is_err());
        let rendered = render_value(text.as_bytes());
        prop_assert_eq!(&rendered, &text);
        prop_assert!(!rendered.contains("[b64:"));
    }
}
