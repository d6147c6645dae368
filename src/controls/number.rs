//! Numeric input component.
//!
//! Distinct from the [`InputState`](crate::model::InputState) family: a
//! number input exposes two independent streams, `value` and `valid`. An
//! unparseable raw string is a legitimate "unset" value (`NaN`), not an
//! error; validity comes from the element's constraint check (`min`/`max`),
//! never from NaN-ness.

use super::{Component, INPUT_DEBOUNCE};
use crate::dom::Element;
use crate::model::range::ends_equal;
use crate::rx::{Debouncer, Publisher, Subscription};

/// A numeric input with debounced, deduplicated `value` and `valid` streams.
///
/// `value` publishes the parsed number (NaN-aware dedup: repeated `NaN` is a
/// duplicate). `valid` is recomputed whenever `value` changes and is itself
/// deduplicated.
#[derive(Debug)]
pub struct NumberInput {
    element: Element,
    value: Publisher<f64>,
    valid: Publisher<bool>,
    debouncer: Debouncer<(f64, bool)>,
}

impl NumberInput {
    /// Wrap a numeric control.
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime (the debounce window needs a timer).
    pub fn new(element: Element) -> Self {
        let value: Publisher<f64> = Publisher::new();
        let valid: Publisher<bool> = Publisher::new();
        let value_publisher = value.clone();
        let valid_publisher = valid.clone();
        let mut last_value: Option<f64> = None;
        let mut last_valid: Option<bool> = None;
        // Validity is captured together with the value at event time (the
        // constraints are static attributes), so the pair survives the
        // debounce window intact.
        let debouncer = Debouncer::new(INPUT_DEBOUNCE, move |(parsed, ok): (f64, bool)| {
            let changed = !last_value.map_or(false, |prev| ends_equal(prev, parsed));
            if changed {
                last_value = Some(parsed);
                value_publisher.publish(parsed);
                if last_valid != Some(ok) {
                    last_valid = Some(ok);
                    valid_publisher.publish(ok);
                }
            }
        });
        Self {
            element,
            value,
            valid,
            debouncer,
        }
    }

    /// Subscribe to the parsed-value stream.
    pub fn subscribe_value(&self) -> Subscription<f64> {
        self.value.subscribe()
    }

    /// Subscribe to the constraint-validity stream.
    pub fn subscribe_valid(&self) -> Subscription<bool> {
        self.valid.subscribe()
    }

    /// A user keystroke: the element now holds `raw`; parse and validate,
    /// then restart the debounce window.
    pub fn input(&self, raw: &str) {
        self.element.set_value(raw);
        self.feed_current();
    }

    /// External write path; goes through the same debounced pipeline so the
    /// dedup invariants hold for both sources.
    pub fn update(&self, raw: &str) {
        self.element.set_value(raw);
        self.feed_current();
    }

    /// The element's current parsed value (`NaN` when unset).
    pub fn current_value(&self) -> f64 {
        self.element.number_value()
    }

    /// The element's current constraint validity.
    pub fn is_valid(&self) -> bool {
        self.element.check_number_validity()
    }

    fn feed_current(&self) {
        self.debouncer.feed((
            self.element.number_value(),
            self.element.check_number_validity(),
        ));
    }
}

impl Component for NumberInput {
    fn element(&self) -> &Element {
        &self.element
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "number_tests.rs"]
mod tests;
