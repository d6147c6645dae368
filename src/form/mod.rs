//! Form components.
//!
//! [`ReactiveForm`] owns serialization and native-behavior suppression;
//! [`SearchForm`] adds the results fetch pipeline; [`FacetedSearchForm`]
//! adds the independent facet fetch. Composition throughout: each layer
//! embeds the previous one.

pub mod search;

pub use search::{FacetedSearchForm, SearchForm, PAGE_LABELS_HEADER, TOTAL_RESULTS_HEADER};

use crate::controls::Component;
use crate::dom::Element;

/// A form wrapper that serializes control state and suppresses accidental
/// native submission.
///
/// Construction marks the form element so Enter no longer triggers a full
/// page load: the form is a live filter, not a submit-and-navigate form.
#[derive(Debug)]
pub struct ReactiveForm {
    element: Element,
    fallback_target: String,
}

impl ReactiveForm {
    /// Wrap a form element. `fallback_target` is the current page path,
    /// used when the element carries no explicit target.
    pub fn new(element: Element, fallback_target: impl Into<String>) -> Self {
        element.suppress_default_submit();
        Self {
            element,
            fallback_target: fallback_target.into(),
        }
    }

    /// The submission target: the element's explicit `target` attribute if
    /// present, else the current page path.
    pub fn target(&self) -> String {
        self.element
            .attr("target")
            .unwrap_or_else(|| self.fallback_target.clone())
    }

    /// Serialize the current form state to a URL-encoded querystring.
    ///
    /// Standard form-encoding rules: every named, non-disabled control in
    /// document order; unchecked checkboxes omitted; a checkbox without a
    /// value submits `on`; multi-value fields repeat their key.
    pub fn serialize(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for control in self.element.named_controls() {
            if control.disabled() {
                continue;
            }
            let Some(name) = control.attr("name") else {
                continue;
            };
            if control.tag() == "input" && control.attr("type").as_deref() == Some("checkbox") {
                if !control.checked() {
                    continue;
                }
                let value = control.value();
                let value = if value.is_empty() { "on" } else { value.as_str() };
                serializer.append_pair(&name, value);
            } else {
                serializer.append_pair(&name, &control.value());
            }
        }
        serializer.finish()
    }

    /// Native form reset: every control back to its default state.
    pub fn reset(&self) {
        self.element.reset();
    }

    /// Dispatch an Enter keypress; returns whether native submission would
    /// proceed (always `false` once wrapped).
    pub fn dispatch_enter(&self) -> bool {
        self.element.dispatch_enter()
    }
}

impl Component for ReactiveForm {
    fn element(&self) -> &Element {
        &self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(tag: &str, type_attr: Option<&str>, name: &str) -> Element {
        let el = Element::new(tag);
        if let Some(t) = type_attr {
            el.set_attr("type", t);
        }
        el.set_attr("name", name);
        el
    }

    fn sample_form() -> Element {
        let form = Element::new("form");

        let query = control("input", Some("text"), "query");
        query.set_value("balzac");
        form.append_child(query);

        let start = control("input", Some("number"), "year_0");
        start.set_value("1920");
        form.append_child(start);

        let stop = control("input", Some("number"), "year_1");
        stop.set_value("1940");
        form.append_child(stop);

        let checked = control("input", Some("checkbox"), "format");
        checked.set_value("Book");
        checked.set_checked(true);
        form.append_child(checked);

        let unchecked = control("input", Some("checkbox"), "format");
        unchecked.set_value("Periodical");
        form.append_child(unchecked);

        form
    }

    #[test]
    fn serializes_named_controls_in_document_order() {
        let form = ReactiveForm::new(sample_form(), "/books/");
        insta::assert_snapshot!(
            form.serialize(),
            @"query=balzac&year_0=1920&year_1=1940&format=Book"
        );
    }

    #[test]
    fn repeated_names_repeat_their_key() {
        let root = sample_form();
        for el in root.query_tag("input") {
            if el.attr("type").as_deref() == Some("checkbox") {
                el.set_checked(true);
            }
        }
        let form = ReactiveForm::new(root, "/books/");
        assert!(form.serialize().contains("format=Book&format=Periodical"));
    }

    #[test]
    fn disabled_controls_are_omitted() {
        let root = sample_form();
        if let Some(query) = root.find_named("query") {
            query.set_disabled(true);
        }
        let form = ReactiveForm::new(root, "/books/");
        assert!(!form.serialize().contains("query="));
    }

    #[test]
    fn checkbox_without_value_submits_on() {
        let root = Element::new("form");
        let checkbox = control("input", Some("checkbox"), "has_card");
        checkbox.set_checked(true);
        root.append_child(checkbox);
        let form = ReactiveForm::new(root, "/members/");
        assert_eq!(form.serialize(), "has_card=on");
    }

    #[test]
    fn values_are_percent_encoded() {
        let root = Element::new("form");
        let query = control("input", Some("text"), "query");
        query.set_value("café anglais");
        root.append_child(query);
        let form = ReactiveForm::new(root, "/books/");
        assert_eq!(form.serialize(), "query=caf%C3%A9+anglais");
    }

    #[test]
    fn target_prefers_the_explicit_attribute() {
        let root = sample_form();
        let form = ReactiveForm::new(root.clone(), "/books/");
        assert_eq!(form.target(), "/books/");

        root.set_attr("target", "/search/books/");
        assert_eq!(form.target(), "/search/books/");
    }

    #[test]
    fn enter_no_longer_submits_natively() {
        let form = ReactiveForm::new(sample_form(), "/books/");
        assert!(!form.dispatch_enter());
    }

    #[test]
    fn reset_restores_control_defaults() {
        let root = Element::new("form");
        let query = control("input", Some("text"), "query");
        query.set_default_value("proust");
        root.append_child(query.clone());
        let form = ReactiveForm::new(root, "/books/");

        query.set_value("balzac");
        form.reset();
        assert_eq!(form.serialize(), "query=proust");
    }
}
