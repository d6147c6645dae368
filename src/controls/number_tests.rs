//! Tests for the numeric input component.

use super::NumberInput;
use crate::dom::Element;

fn bounded_input(max: &str) -> Element {
    let el = Element::new("input");
    el.set_attr("type", "number");
    el.set_attr("name", "year");
    el.set_attr("max", max);
    el
}

#[tokio::test(start_paused = true)]
async fn out_of_range_value_still_publishes_with_invalid_flag() {
    let input = NumberInput::new(bounded_input("50"));
    let mut values = input.subscribe_value();
    let mut valids = input.subscribe_valid();

    input.input("100");

    assert_eq!(values.next().await, Some(100.0));
    assert_eq!(valids.next().await, Some(false));
}

#[tokio::test(start_paused = true)]
async fn non_numeric_input_publishes_nan_and_stays_valid() {
    let input = NumberInput::new(bounded_input("50"));
    let mut values = input.subscribe_value();
    let mut valids = input.subscribe_valid();

    input.input("wrong!");

    let value = values.next().await.expect("value published");
    assert!(value.is_nan(), "unparseable input is the unset sentinel");
    // An unset value is constraint-valid.
    assert_eq!(valids.next().await, Some(true));

    input.input("100");
    assert_eq!(values.next().await, Some(100.0));
    assert_eq!(valids.next().await, Some(false));
}

#[tokio::test(start_paused = true)]
async fn repeated_nan_is_a_duplicate() {
    let input = NumberInput::new(bounded_input("50"));
    let mut values = input.subscribe_value();

    input.input("wrong!");
    assert!(values.next().await.expect("first publish").is_nan());

    input.input("nope");
    tokio::time::sleep(std::time::Duration::from_millis(600)).await;
    assert_eq!(values.try_next(), None, "NaN after NaN must deduplicate");
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_coalesce_to_final_value() {
    let input = NumberInput::new(bounded_input("2000"));
    let mut values = input.subscribe_value();

    input.input("1");
    input.input("19");
    input.input("192");
    input.input("1920");

    assert_eq!(values.next().await, Some(1920.0));
    assert_eq!(values.try_next(), None);
}

#[tokio::test(start_paused = true)]
async fn validity_recovers_when_value_returns_in_range() {
    let input = NumberInput::new(bounded_input("50"));
    let mut valids = input.subscribe_valid();

    input.input("100");
    assert_eq!(valids.next().await, Some(false));

    input.input("25");
    assert_eq!(valids.next().await, Some(true));
}
