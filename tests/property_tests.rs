//! Property-based tests for range, filter-parsing, and serialization
//! invariants.

use circ_client::controls::filters::parse_query;
use circ_client::dom::Element;
use circ_client::form::ReactiveForm;
use circ_client::model::range::ends_equal;
use circ_client::model::{FilterValue, Range};
use proptest::prelude::*;

/// A range end: finite value or the unset sentinel.
fn range_end() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => (-5000.0..5000.0f64),
        1 => Just(f64::NAN),
    ]
}

/// Keys that survive querystring round-trips without suffix collapsing.
fn plain_key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn value_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,12}"
}

// ===== Range invariants =====

proptest! {
    #[test]
    fn range_equality_is_reflexive(start in range_end(), stop in range_end()) {
        let range = Range::new(start, stop);
        prop_assert_eq!(range, range);
    }

    #[test]
    fn range_equality_is_symmetric(
        a in range_end(), b in range_end(), c in range_end(), d in range_end()
    ) {
        let left = Range::new(a, b);
        let right = Range::new(c, d);
        prop_assert_eq!(left == right, right == left);
    }

    #[test]
    fn ends_equal_matches_value_equality_for_finite_ends(
        a in -5000.0..5000.0f64, b in -5000.0..5000.0f64
    ) {
        prop_assert_eq!(ends_equal(a, b), a == b);
    }

    #[test]
    fn sentinel_never_equals_a_value(v in -5000.0..5000.0f64) {
        prop_assert!(!ends_equal(f64::NAN, v));
        prop_assert!(!ends_equal(v, f64::NAN));
        prop_assert!(ends_equal(f64::NAN, f64::NAN));
    }

    #[test]
    fn ordering_matches_comparison_for_set_pairs(
        start in -5000.0..5000.0f64, stop in -5000.0..5000.0f64
    ) {
        prop_assert_eq!(Range::new(start, stop).in_order(), start <= stop);
    }

    #[test]
    fn unset_ends_never_break_ordering(v in -5000.0..5000.0f64) {
        prop_assert!(Range::new(f64::NAN, v).in_order());
        prop_assert!(Range::new(v, f64::NAN).in_order());
    }
}

// ===== Filter parsing invariants =====

proptest! {
    #[test]
    fn repeated_keys_accumulate_every_value(
        key in plain_key(),
        values in prop::collection::vec(value_string(), 1..5)
    ) {
        let query: Vec<String> = values
            .iter()
            .map(|v| {
                format!(
                    "{key}={}",
                    url::form_urlencoded::byte_serialize(v.as_bytes()).collect::<String>()
                )
            })
            .collect();
        let map = parse_query(&query.join("&"));

        let parsed = map.get(&key).expect("key present");
        let expected: Vec<&str> = values.iter().map(String::as_str).collect();
        prop_assert_eq!(parsed.values(), expected);
        match parsed {
            FilterValue::Single(_) => prop_assert_eq!(values.len(), 1),
            FilterValue::Multiple(vs) => prop_assert!(vs.len() >= 2),
        }
    }

    #[test]
    fn digit_suffixes_collapse_to_the_base_key(
        key in plain_key(), suffix in 0usize..10, value in "[a-z0-9]{1,6}"
    ) {
        let map = parse_query(&format!("{key}_{suffix}={value}"));
        let suffixed_key = format!("{key}_{suffix}");
        prop_assert!(map.contains_key(&key));
        prop_assert!(!map.contains_key(&suffixed_key));
    }
}

// ===== Serialization invariants =====

proptest! {
    #[test]
    fn only_checked_boxes_serialize(checked in prop::collection::vec(any::<bool>(), 1..6)) {
        let root = Element::new("form");
        for (index, is_checked) in checked.iter().enumerate() {
            let checkbox = Element::new("input");
            checkbox.set_attr("type", "checkbox");
            checkbox.set_attr("name", "format");
            checkbox.set_value(&format!("choice{index}"));
            checkbox.set_checked(*is_checked);
            root.append_child(checkbox);
        }
        let form = ReactiveForm::new(root, "/books/");
        let serialized = form.serialize();

        for (index, is_checked) in checked.iter().enumerate() {
            let pair = format!("format=choice{index}");
            prop_assert_eq!(serialized.contains(&pair), *is_checked);
        }
    }

    #[test]
    fn serialization_round_trips_through_filter_parsing(
        query in value_string(), year in 1500u32..2000
    ) {
        let root = Element::new("form");
        let text = Element::new("input");
        text.set_attr("type", "text");
        text.set_attr("name", "query");
        text.set_value(&query);
        root.append_child(text);
        let start = Element::new("input");
        start.set_attr("type", "number");
        start.set_attr("name", "year_0");
        start.set_value(&year.to_string());
        root.append_child(start);

        let form = ReactiveForm::new(root, "/books/");
        let map = parse_query(&form.serialize());

        prop_assert_eq!(map.get("query"), Some(&FilterValue::Single(query)));
        prop_assert_eq!(
            map.get("year"),
            Some(&FilterValue::Single(year.to_string()))
        );
    }
}
