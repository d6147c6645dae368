//! Combined numeric range filter.
//!
//! Composes two [`NumberInput`]s addressed positionally: the first numeric
//! input inside the container is the start, the second the stop. That is an
//! ordering contract with the scaffold, not a name-based lookup.

use super::{Component, NumberInput};
use crate::dom::Element;
use crate::model::{Range, WiringError};
use crate::rx::{StateCell, StateHandle};

/// A two-ended numeric filter with combined value and validity channels.
///
/// `values` carries the combined latest pair, re-emitted whenever either
/// input's debounced value changes, with an immediate `[NaN, NaN]` tick at
/// construction. `valid` is true iff both inputs individually pass their
/// constraints *and* the pair is in order (`start <= stop`, unset ends
/// acting as infinities for the comparison only). The cross-field check
/// re-runs with the latest values on every constituent emission: value and
/// validity are distinct pipelines that must stay cross-referenced.
///
/// Both combined channels replay their latest combination to new watchers
/// (the combine-latest re-subscription tick).
#[derive(Debug)]
pub struct RangeFilter {
    element: Element,
    start: NumberInput,
    stop: NumberInput,
    values: StateHandle<Range>,
    valid: StateHandle<bool>,
}

impl RangeFilter {
    /// Bind to a container holding two numeric inputs.
    ///
    /// # Errors
    ///
    /// Returns [`WiringError::RangeInputs`] when the container does not hold
    /// at least two `input` elements.
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime (the combine task and the inputs'
    /// debounce windows need one).
    pub fn new(element: Element) -> Result<Self, WiringError> {
        let inputs = element.query_tag("input");
        if inputs.len() < 2 {
            return Err(WiringError::RangeInputs {
                found: inputs.len(),
            });
        }
        let start = NumberInput::new(inputs[0].clone());
        let stop = NumberInput::new(inputs[1].clone());

        let values_cell = StateCell::new(Range::UNSET);
        let valid_cell = StateCell::new(true);
        let values = values_cell.handle();
        let valid = valid_cell.handle();

        let mut start_values = start.subscribe_value();
        let mut stop_values = stop.subscribe_value();
        let mut start_valid = start.subscribe_valid();
        let mut stop_valid = stop.subscribe_valid();
        tokio::spawn(async move {
            let mut start_value = f64::NAN;
            let mut stop_value = f64::NAN;
            let mut start_ok = true;
            let mut stop_ok = true;
            loop {
                tokio::select! {
                    Some(v) = start_values.next() => {
                        start_value = v;
                        values_cell.set(Range::new(start_value, stop_value));
                    }
                    Some(v) = stop_values.next() => {
                        stop_value = v;
                        values_cell.set(Range::new(start_value, stop_value));
                    }
                    Some(ok) = start_valid.next() => start_ok = ok,
                    Some(ok) = stop_valid.next() => stop_ok = ok,
                    else => break,
                }
                valid_cell
                    .set(start_ok && stop_ok && Range::new(start_value, stop_value).in_order());
            }
        });

        Ok(Self {
            element,
            start,
            stop,
            values,
            valid,
        })
    }

    /// The start-end input (first numeric input in the container).
    pub fn start(&self) -> &NumberInput {
        &self.start
    }

    /// The stop-end input (second numeric input in the container).
    pub fn stop(&self) -> &NumberInput {
        &self.stop
    }

    /// Handle on the combined-pair channel.
    pub fn values(&self) -> StateHandle<Range> {
        self.values.clone()
    }

    /// Handle on the combined-validity channel.
    pub fn valid(&self) -> StateHandle<bool> {
        self.valid.clone()
    }
}

impl Component for RangeFilter {
    fn element(&self) -> &Element {
        &self.element
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "range_filter_tests.rs"]
mod tests;
