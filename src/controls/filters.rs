//! Active-filter display state.
//!
//! Parses the querystring the page loaded with into a key -> value(s)
//! mapping for the filter-chip UI. This is the one component whose state
//! replays: chips must render the moment anything subscribes, never flash
//! empty while waiting for a first async update.

use super::Component;
use crate::dom::Element;
use crate::model::{FilterMap, FilterValue};
use crate::rx::{StateCell, StateHandle};
use std::collections::btree_map::Entry;

/// Parse a querystring into accumulated filter state.
///
/// Keys with a trailing `_<digits>` suffix (range endpoint encoding) are
/// collapsed to their base key. A recurring base key accumulates: the first
/// duplicate upgrades the scalar to a two-element array, later duplicates
/// append.
pub fn parse_query(query: &str) -> FilterMap {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut map = FilterMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let base = collapse_range_suffix(&key).to_string();
        match map.entry(base) {
            Entry::Vacant(slot) => {
                slot.insert(FilterValue::Single(value.into_owned()));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(value.into_owned()),
        }
    }
    map
}

/// `year_0` -> `year`; keys without a digits-only suffix pass through.
fn collapse_range_suffix(key: &str) -> &str {
    match key.rsplit_once('_') {
        Some((base, suffix))
            if !base.is_empty()
                && !suffix.is_empty()
                && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => key,
    }
}

/// The filter-chip container component.
///
/// At construction, exactly once, for whatever anchors exist in the initial
/// markup, every anchor inside the container is turned into a
/// non-navigating button (`href` stripped, `role=button`), and the current
/// querystring is parsed into the replayed filter state.
#[derive(Debug)]
pub struct ActiveFilters {
    element: Element,
    state: StateCell<FilterMap>,
}

impl ActiveFilters {
    /// Bind to the chip container, seeding state from `query`.
    pub fn new(element: Element, query: &str) -> Self {
        for anchor in element.query_tag("a") {
            anchor.remove_attr("href");
            anchor.set_attr("role", "button");
        }
        Self {
            element,
            state: StateCell::new(parse_query(query)),
        }
    }

    /// Handle on the replayed filter state.
    pub fn state(&self) -> StateHandle<FilterMap> {
        self.state.handle()
    }

    /// Snapshot of the current filter state.
    pub fn current(&self) -> FilterMap {
        self.state.get()
    }
}

impl Component for ActiveFilters {
    fn element(&self) -> &Element {
        &self.element
    }
}
