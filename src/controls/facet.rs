//! Facet display components.
//!
//! Facet payloads are opaque JSON from the server: `field -> [{value,
//! count}]` buckets. These components consume the payload only to refresh
//! per-choice counts; they never interpret it further. Member toggles are
//! merged into a single change stream per facet.

use super::{CheckboxInput, Component};
use crate::dom::Element;
use crate::model::InputState;
use crate::rx::{Publisher, Subscription};
use serde_json::Value;

/// Per-choice count refresh shared by both facet flavors.
///
/// Unknown choices keep their last count; zero-count choices are disabled.
fn apply_bucket(checkbox: &CheckboxInput, buckets: &[Value]) {
    let value = checkbox.value();
    for bucket in buckets {
        if bucket.get("value").and_then(Value::as_str) == Some(value.as_str()) {
            if let Some(count) = bucket.get("count").and_then(Value::as_u64) {
                checkbox.element().set_attr("data-count", &count.to_string());
                checkbox.element().set_disabled(count == 0);
            }
        }
    }
}

/// A group of labeled checkboxes for one facet field.
#[derive(Debug)]
pub struct ChoiceFacet {
    element: Element,
    field: String,
    choices: Vec<CheckboxInput>,
    changes: Publisher<InputState>,
}

impl ChoiceFacet {
    /// Bind to a container of checkboxes for `field`.
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime (member toggles are forwarded by a
    /// background task per choice).
    pub fn new(element: Element, field: impl Into<String>) -> Self {
        let changes: Publisher<InputState> = Publisher::new();
        let choices: Vec<CheckboxInput> = element
            .query_tag("input")
            .into_iter()
            .filter(|el| el.attr("type").as_deref() == Some("checkbox"))
            .map(CheckboxInput::new)
            .collect();
        for choice in &choices {
            let mut sub = choice.subscribe();
            let merged = changes.clone();
            tokio::spawn(async move {
                while let Some(state) = sub.next().await {
                    merged.publish(state);
                }
            });
        }
        Self {
            element,
            field: field.into(),
            choices,
            changes,
        }
    }

    /// Subscribe to the merged toggle stream of every member checkbox.
    pub fn subscribe_changes(&self) -> Subscription<InputState> {
        self.changes.subscribe()
    }

    /// Refresh per-choice counts from an opaque facet payload.
    pub fn update_counts(&self, facets: &Value) {
        let Some(buckets) = self.field_buckets(facets) else {
            return;
        };
        for choice in &self.choices {
            apply_bucket(choice, buckets);
        }
    }

    /// Toggle the choice with the given value; `false` when unknown.
    pub fn toggle(&self, value: &str) -> bool {
        match self.find_choice(value) {
            Some(choice) => {
                choice.toggle();
                true
            }
            None => false,
        }
    }

    /// Check the choice with the given value; `false` when unknown.
    pub fn check(&self, value: &str) -> bool {
        match self.find_choice(value) {
            Some(choice) => {
                choice.update(InputState::checkbox(value, true));
                true
            }
            None => false,
        }
    }

    /// Values of the currently checked choices, in document order.
    pub fn checked_values(&self) -> Vec<String> {
        self.choices
            .iter()
            .filter(|c| c.checked())
            .map(CheckboxInput::value)
            .collect()
    }

    /// The facet field this group represents.
    pub fn field(&self) -> &str {
        &self.field
    }

    fn find_choice(&self, value: &str) -> Option<&CheckboxInput> {
        self.choices.iter().find(|c| c.value() == value)
    }

    fn field_buckets<'a>(&self, facets: &'a Value) -> Option<&'a [Value]> {
        facets.get(&self.field).and_then(Value::as_array).map(Vec::as_slice)
    }
}

impl Component for ChoiceFacet {
    fn element(&self) -> &Element {
        &self.element
    }
}

/// A single on/off facet (one checkbox plus its count).
#[derive(Debug)]
pub struct BooleanFacet {
    field: String,
    choice: CheckboxInput,
}

impl BooleanFacet {
    /// Bind to one checkbox element for `field`.
    pub fn new(element: Element, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            choice: CheckboxInput::new(element),
        }
    }

    /// Subscribe to toggles.
    pub fn subscribe(&self) -> Subscription<InputState> {
        self.choice.subscribe()
    }

    /// A user toggle.
    pub fn toggle(&self) {
        self.choice.toggle();
    }

    /// External write path (hydration).
    pub fn update(&self, state: InputState) {
        self.choice.update(state);
    }

    /// Whether the facet is on.
    pub fn checked(&self) -> bool {
        self.choice.checked()
    }

    /// Refresh the count from an opaque facet payload.
    pub fn update_count(&self, facets: &Value) {
        if let Some(buckets) = facets.get(&self.field).and_then(Value::as_array) {
            apply_bucket(&self.choice, buckets);
        }
    }
}

impl Component for BooleanFacet {
    fn element(&self) -> &Element {
        self.choice.element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facet_container(values: &[&str]) -> Element {
        let container = Element::new("fieldset");
        for value in values {
            let checkbox = Element::new("input");
            checkbox.set_attr("type", "checkbox");
            checkbox.set_attr("name", "format");
            checkbox.set_value(value);
            container.append_child(checkbox);
        }
        container
    }

    #[tokio::test]
    async fn member_toggles_merge_into_one_stream() {
        let facet = ChoiceFacet::new(facet_container(&["Book", "Periodical"]), "format");
        let mut changes = facet.subscribe_changes();

        assert!(facet.toggle("Periodical"));
        assert_eq!(
            changes.next().await,
            Some(InputState::checkbox("Periodical", true))
        );

        assert!(facet.toggle("Book"));
        assert_eq!(changes.next().await, Some(InputState::checkbox("Book", true)));
    }

    #[tokio::test]
    async fn unknown_choice_is_reported() {
        let facet = ChoiceFacet::new(facet_container(&["Book"]), "format");
        assert!(!facet.toggle("Periodical"));
    }

    #[tokio::test]
    async fn counts_refresh_and_zero_disables() {
        let container = facet_container(&["Book", "Periodical"]);
        let facet = ChoiceFacet::new(container.clone(), "format");

        facet.update_counts(&json!({
            "format": [
                {"value": "Book", "count": 12},
                {"value": "Periodical", "count": 0},
            ]
        }));

        let inputs = container.query_tag("input");
        assert_eq!(inputs[0].attr("data-count").as_deref(), Some("12"));
        assert!(!inputs[0].disabled());
        assert_eq!(inputs[1].attr("data-count").as_deref(), Some("0"));
        assert!(inputs[1].disabled());
    }

    #[tokio::test]
    async fn unknown_choices_keep_their_last_count() {
        let container = facet_container(&["Book"]);
        let facet = ChoiceFacet::new(container.clone(), "format");

        facet.update_counts(&json!({"format": [{"value": "Book", "count": 3}]}));
        facet.update_counts(&json!({"format": [{"value": "Other", "count": 9}]}));

        let inputs = container.query_tag("input");
        assert_eq!(inputs[0].attr("data-count").as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn boolean_facet_reads_its_own_bucket() {
        let checkbox = Element::new("input");
        checkbox.set_attr("type", "checkbox");
        checkbox.set_value("true");
        let facet = BooleanFacet::new(checkbox.clone(), "has_card");

        facet.update_count(&json!({"has_card": [{"value": "true", "count": 120}]}));
        assert_eq!(checkbox.attr("data-count").as_deref(), Some("120"));
    }
}
