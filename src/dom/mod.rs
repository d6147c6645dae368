//! Client-owned element tree.
//!
//! The stand-in for the server-rendered markup the reactive components wrap:
//! a minimal form-control tree with attributes, class lists, values and
//! defaults, constraint validation for numeric inputs, and just enough
//! geometry (style `top`, layout rect top) for the scroll-driven controls.
//!
//! [`Element`] is a cheaply clonable handle; every element is *owned* by
//! exactly one component or page, and the model is single-threaded, so
//! handles never cross task boundaries.

use crate::model::SelectOption;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// A handle to one element in the tree.
///
/// Cloning the handle aliases the same element. Component constructors take
/// the handle for the element they wrap; nothing queries ambient document
/// state.
#[derive(Debug, Clone)]
pub struct Element {
    inner: Rc<RefCell<ElementData>>,
}

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    style: BTreeMap<String, String>,
    value: String,
    default_value: String,
    checked: bool,
    default_checked: bool,
    disabled: bool,
    text: String,
    rect_top: f64,
    suppress_submit: bool,
    children: Vec<Element>,
}

impl Element {
    /// Create a detached element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        let data = ElementData {
            tag: tag.into(),
            ..ElementData::default()
        };
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    /// Whether two handles alias the same element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The element's tag name.
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    // ===== Attributes =====

    /// Read an attribute.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.inner.borrow().attrs.get(name).cloned()
    }

    /// Set an attribute.
    pub fn set_attr(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    /// Remove an attribute; no-op when absent.
    pub fn remove_attr(&self, name: &str) {
        self.inner.borrow_mut().attrs.remove(name);
    }

    /// Whether an attribute is present (regardless of value).
    pub fn has_attr(&self, name: &str) -> bool {
        self.inner.borrow().attrs.contains_key(name)
    }

    // ===== Class list =====

    /// Add a class; no-op when already present.
    pub fn add_class(&self, class: &str) {
        self.inner.borrow_mut().classes.insert(class.to_string());
    }

    /// Remove a class; no-op when absent.
    pub fn remove_class(&self, class: &str) {
        self.inner.borrow_mut().classes.remove(class);
    }

    /// Whether a class is present.
    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.contains(class)
    }

    // ===== Value / checked / disabled / text =====

    /// Current value string.
    pub fn value(&self) -> String {
        self.inner.borrow().value.clone()
    }

    /// Set the current value.
    pub fn set_value(&self, value: &str) {
        self.inner.borrow_mut().value = value.to_string();
    }

    /// Set both the default and current value, as server-rendered markup
    /// would.
    pub fn set_default_value(&self, value: &str) {
        let mut data = self.inner.borrow_mut();
        data.default_value = value.to_string();
        data.value = value.to_string();
    }

    /// Current checked flag.
    pub fn checked(&self) -> bool {
        self.inner.borrow().checked
    }

    /// Set the current checked flag.
    pub fn set_checked(&self, checked: bool) {
        self.inner.borrow_mut().checked = checked;
    }

    /// Set both the default and current checked flag.
    pub fn set_default_checked(&self, checked: bool) {
        let mut data = self.inner.borrow_mut();
        data.default_checked = checked;
        data.checked = checked;
    }

    /// Disabled flag.
    pub fn disabled(&self) -> bool {
        self.inner.borrow().disabled
    }

    /// Set the disabled flag.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Text content (labels, injected fragments).
    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// Replace the text content.
    pub fn set_text(&self, text: &str) {
        self.inner.borrow_mut().text = text.to_string();
    }

    // ===== Tree =====

    /// Append a child element.
    pub fn append_child(&self, child: Element) {
        self.inner.borrow_mut().children.push(child);
    }

    /// Handles to the direct children, in document order.
    pub fn children(&self) -> Vec<Element> {
        self.inner.borrow().children.clone()
    }

    /// Drop all children.
    pub fn clear_children(&self) {
        self.inner.borrow_mut().children.clear();
    }

    /// All descendants in document (preorder) order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        fn collect(el: &Element, out: &mut Vec<Element>) {
            for child in el.children() {
                out.push(child.clone());
                collect(&child, out);
            }
        }
        collect(self, &mut out);
        out
    }

    /// Descendants with the given tag, in document order.
    pub fn query_tag(&self, tag: &str) -> Vec<Element> {
        self.descendants()
            .into_iter()
            .filter(|el| el.tag() == tag)
            .collect()
    }

    /// Descendant form controls (`input`, `select`) carrying a `name`
    /// attribute, in document order.
    pub fn named_controls(&self) -> Vec<Element> {
        self.descendants()
            .into_iter()
            .filter(|el| {
                let tag = el.tag();
                (tag == "input" || tag == "select") && el.has_attr("name")
            })
            .collect()
    }

    /// First descendant control with the given `name` attribute.
    pub fn find_named(&self, name: &str) -> Option<Element> {
        self.named_controls()
            .into_iter()
            .find(|el| el.attr("name").as_deref() == Some(name))
    }

    // ===== Numeric constraint validation =====

    /// The value parsed as a number; `NaN` when empty or unparseable.
    pub fn number_value(&self) -> f64 {
        self.value().trim().parse::<f64>().unwrap_or(f64::NAN)
    }

    /// Constraint validity for a numeric input.
    ///
    /// An empty or unparseable raw value is the unset sentinel and always
    /// constraint-valid; a parseable value must satisfy the `min`/`max`
    /// attributes (when present and themselves numeric).
    pub fn check_number_validity(&self) -> bool {
        let raw = self.value();
        let raw = raw.trim();
        if raw.is_empty() {
            return true;
        }
        let value: f64 = match raw.parse() {
            Ok(v) => v,
            Err(_) => return true,
        };
        if let Some(min) = self.attr("min").and_then(|m| m.parse::<f64>().ok()) {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.attr("max").and_then(|m| m.parse::<f64>().ok()) {
            if value > max {
                return false;
            }
        }
        true
    }

    // ===== Style / geometry =====

    /// Set a computed-style property.
    pub fn set_style(&self, property: &str, value: &str) {
        self.inner
            .borrow_mut()
            .style
            .insert(property.to_string(), value.to_string());
    }

    /// Read a computed-style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.inner.borrow().style.get(property).cloned()
    }

    /// The style `top` as pixels: `0.0` when unset or not a pixel value.
    pub fn style_top_px(&self) -> f64 {
        self.style("top")
            .and_then(|t| t.strip_suffix("px").map(str::to_string))
            .and_then(|t| t.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// Current layout-box top.
    pub fn rect_top(&self) -> f64 {
        self.inner.borrow().rect_top
    }

    /// Move the layout box (scroll simulation).
    pub fn set_rect_top(&self, top: f64) {
        self.inner.borrow_mut().rect_top = top;
    }

    // ===== Select options =====

    /// Replace the rendered option list wholesale.
    ///
    /// The current value is kept when still present among the new options;
    /// otherwise the first option is selected (or the value cleared when the
    /// list is empty), matching native select behavior.
    pub fn replace_options(&self, options: &[SelectOption]) {
        let current = self.value();
        self.clear_children();
        for option in options {
            let el = Element::new("option");
            el.set_attr("value", &option.value);
            el.set_text(&option.text);
            self.append_child(el);
        }
        let next = if options.iter().any(|o| o.value == current) {
            current
        } else {
            options.first().map(|o| o.value.clone()).unwrap_or_default()
        };
        self.set_select_value(&next);
    }

    /// Select the option with the given value, updating the element's value
    /// and the options' `selected` markers.
    ///
    /// When no option matches, the selection and value are cleared.
    pub fn set_select_value(&self, value: &str) {
        let mut found = false;
        for option in self.query_tag("option") {
            if option.attr("value").as_deref() == Some(value) {
                option.set_attr("selected", "selected");
                found = true;
            } else {
                option.remove_attr("selected");
            }
        }
        self.set_value(if found { value } else { "" });
    }

    // ===== Form behavior =====

    /// Mark this form element so Enter no longer triggers native submission.
    pub fn suppress_default_submit(&self) {
        self.inner.borrow_mut().suppress_submit = true;
    }

    /// Dispatch an Enter keypress to this form element.
    ///
    /// Returns whether native submission (a full page load) would proceed.
    pub fn dispatch_enter(&self) -> bool {
        !self.inner.borrow().suppress_submit
    }

    /// Native form reset: restore every element in the subtree (self
    /// included) to its default value and checked flag.
    pub fn reset(&self) {
        {
            let mut data = self.inner.borrow_mut();
            data.value = data.default_value.clone();
            data.checked = data.default_checked;
        }
        for child in self.children() {
            child.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_input(name: &str, min: Option<&str>, max: Option<&str>) -> Element {
        let el = Element::new("input");
        el.set_attr("type", "number");
        el.set_attr("name", name);
        if let Some(min) = min {
            el.set_attr("min", min);
        }
        if let Some(max) = max {
            el.set_attr("max", max);
        }
        el
    }

    #[test]
    fn descendants_are_preorder() {
        let root = Element::new("form");
        let fieldset = Element::new("fieldset");
        let input = Element::new("input");
        input.set_attr("name", "query");
        fieldset.append_child(input);
        root.append_child(fieldset);
        let select = Element::new("select");
        select.set_attr("name", "sort");
        root.append_child(select);

        let tags: Vec<String> = root.descendants().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["fieldset", "input", "select"]);
    }

    #[test]
    fn named_controls_skip_anonymous_elements() {
        let root = Element::new("form");
        root.append_child(Element::new("input"));
        let named = Element::new("input");
        named.set_attr("name", "query");
        root.append_child(named);

        let controls = root.named_controls();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].attr("name").as_deref(), Some("query"));
    }

    #[test]
    fn out_of_range_value_is_invalid() {
        let el = number_input("year", None, Some("50"));
        el.set_value("100");
        assert!(!el.check_number_validity());
        assert_eq!(el.number_value(), 100.0);
    }

    #[test]
    fn empty_value_is_always_valid() {
        let el = number_input("year", Some("1900"), Some("1950"));
        el.set_value("");
        assert!(el.check_number_validity());
        assert!(el.number_value().is_nan());
    }

    #[test]
    fn unparseable_value_is_unset_and_valid() {
        let el = number_input("year", Some("1900"), Some("1950"));
        el.set_value("wrong!");
        assert!(el.check_number_validity());
        assert!(el.number_value().is_nan());
    }

    #[test]
    fn style_top_parses_pixels_only() {
        let el = Element::new("div");
        assert_eq!(el.style_top_px(), 0.0);
        el.set_style("top", "12px");
        assert_eq!(el.style_top_px(), 12.0);
        el.set_style("top", "2em");
        assert_eq!(el.style_top_px(), 0.0);
    }

    #[test]
    fn reset_restores_defaults_in_subtree() {
        let form = Element::new("form");
        let input = Element::new("input");
        input.set_default_value("1920");
        let checkbox = Element::new("input");
        checkbox.set_default_checked(false);
        form.append_child(input.clone());
        form.append_child(checkbox.clone());

        input.set_value("1999");
        checkbox.set_checked(true);
        form.reset();

        assert_eq!(input.value(), "1920");
        assert!(!checkbox.checked());
    }

    #[test]
    fn replace_options_keeps_current_value_when_present() {
        let select = Element::new("select");
        select.replace_options(&[
            SelectOption::new("1", "1"),
            SelectOption::new("2", "2"),
        ]);
        select.set_select_value("2");
        select.replace_options(&[
            SelectOption::new("2", "2"),
            SelectOption::new("3", "3"),
        ]);
        assert_eq!(select.value(), "2");
    }

    #[test]
    fn replace_options_falls_back_to_first_option() {
        let select = Element::new("select");
        select.replace_options(&[SelectOption::new("1", "1"), SelectOption::new("2", "2")]);
        select.set_select_value("2");
        select.replace_options(&[SelectOption::new("5", "5")]);
        assert_eq!(select.value(), "5");
    }

    #[test]
    fn selecting_missing_value_clears_selection() {
        let select = Element::new("select");
        select.replace_options(&[SelectOption::new("1", "1")]);
        select.set_select_value("9");
        assert_eq!(select.value(), "");
    }

    #[test]
    fn enter_is_suppressed_after_marking() {
        let form = Element::new("form");
        assert!(form.dispatch_enter());
        form.suppress_default_submit();
        assert!(!form.dispatch_enter());
    }
}
