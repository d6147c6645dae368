//! Select component.
//!
//! Three independent channels over one element: `value`, `options`, and
//! `disabled`. User events and programmatic sets publish through the same
//! path, so subscribers cannot tell the sources apart.

use super::Component;
use crate::dom::Element;
use crate::model::SelectOption;
use crate::rx::{Publisher, Subscription};

/// A select control with observable value, options, and disabled channels.
#[derive(Debug)]
pub struct SelectInput {
    element: Element,
    value: Publisher<String>,
    options: Publisher<Vec<SelectOption>>,
    disabled: Publisher<bool>,
}

impl SelectInput {
    /// Wrap a select control.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            value: Publisher::new(),
            options: Publisher::new(),
            disabled: Publisher::new(),
        }
    }

    /// Subscribe to selection changes.
    pub fn subscribe_value(&self) -> Subscription<String> {
        self.value.subscribe()
    }

    /// Subscribe to option-list replacements.
    pub fn subscribe_options(&self) -> Subscription<Vec<SelectOption>> {
        self.options.subscribe()
    }

    /// Subscribe to disabled-flag changes.
    pub fn subscribe_disabled(&self) -> Subscription<bool> {
        self.disabled.subscribe()
    }

    /// A user selection; same path as [`set_value`](SelectInput::set_value).
    pub fn input(&self, value: &str) {
        self.set_value(value);
    }

    /// Select `value`, marking the matching option, and publish what the
    /// element actually holds afterwards (empty when no option matched).
    pub fn set_value(&self, value: &str) {
        self.element.set_select_value(value);
        self.value.publish(self.element.value());
    }

    /// Replace the rendered option list wholesale and publish it. No
    /// diffing.
    pub fn replace_options(&self, options: Vec<SelectOption>) {
        self.element.replace_options(&options);
        self.options.publish(options);
    }

    /// Apply and publish the disabled flag.
    pub fn set_disabled(&self, disabled: bool) {
        self.element.set_disabled(disabled);
        self.disabled.publish(disabled);
    }

    /// Enable or disable a single option by value; no-op when absent.
    pub fn set_option_disabled(&self, value: &str, disabled: bool) {
        for option in self.element.query_tag("option") {
            if option.attr("value").as_deref() == Some(value) {
                option.set_disabled(disabled);
            }
        }
    }

    /// The element's current selection.
    pub fn value(&self) -> String {
        self.element.value()
    }
}

impl Component for SelectInput {
    fn element(&self) -> &Element {
        &self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort_select() -> SelectInput {
        let el = Element::new("select");
        el.set_attr("name", "sort");
        let select = SelectInput::new(el);
        select.replace_options(vec![
            SelectOption::new("title", "Title"),
            SelectOption::new("author", "Author"),
        ]);
        select
    }

    #[tokio::test]
    async fn programmatic_set_and_user_input_are_indistinguishable() {
        let select = sort_select();
        let mut values = select.subscribe_value();

        select.set_value("author");
        select.input("title");

        assert_eq!(values.next().await.as_deref(), Some("author"));
        assert_eq!(values.next().await.as_deref(), Some("title"));
    }

    #[tokio::test]
    async fn setting_unknown_value_publishes_element_truth() {
        let select = sort_select();
        let mut values = select.subscribe_value();

        select.set_value("nonsense");
        assert_eq!(values.next().await.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn replacing_options_publishes_the_new_list() {
        let select = sort_select();
        let mut options = select.subscribe_options();

        let pages = vec![SelectOption::new("1", "1 – 100"), SelectOption::new("2", "101 – 200")];
        select.replace_options(pages.clone());

        assert_eq!(options.next().await, Some(pages));
    }

    #[tokio::test]
    async fn disabled_flag_round_trips() {
        let select = sort_select();
        let mut disabled = select.subscribe_disabled();

        select.set_disabled(true);
        assert_eq!(disabled.next().await, Some(true));
        assert!(select.element().disabled());
    }

    #[tokio::test]
    async fn single_option_can_be_disabled() {
        let select = sort_select();
        select.set_option_disabled("author", true);
        let options = select.element().query_tag("option");
        assert!(!options[0].disabled());
        assert!(options[1].disabled());
    }
}
