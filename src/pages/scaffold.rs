//! Element scaffolds for the search pages.
//!
//! These trees play the part of the server-rendered markup the components
//! attach to. Each builder returns detached elements; the page constructors
//! assemble and hydrate them from the load-time querystring, exactly as the
//! server would have rendered the current state.

use crate::dom::Element;
use crate::model::{FilterMap, SelectOption};

/// A named text input.
pub(crate) fn text_input(name: &str) -> Element {
    let el = Element::new("input");
    el.set_attr("type", "text");
    el.set_attr("name", name);
    el
}

/// A named checkbox with a fixed submission value.
pub(crate) fn checkbox(name: &str, value: &str) -> Element {
    let el = Element::new("input");
    el.set_attr("type", "checkbox");
    el.set_attr("name", name);
    el.set_value(value);
    el
}

/// A named select with initial options.
pub(crate) fn select(name: &str, options: &[(&str, &str)]) -> Element {
    let el = Element::new("select");
    el.set_attr("name", name);
    let options: Vec<SelectOption> = options
        .iter()
        .map(|(value, text)| SelectOption::new(*value, *text))
        .collect();
    el.replace_options(&options);
    el
}

/// A range-filter container: two numeric inputs named `<base>_0` and
/// `<base>_1`, sharing the same bounds.
pub(crate) fn range(base: &str, min: &str, max: &str) -> Element {
    let container = Element::new("div");
    for suffix in ["0", "1"] {
        let input = Element::new("input");
        input.set_attr("type", "number");
        input.set_attr("name", &format!("{base}_{suffix}"));
        input.set_attr("min", min);
        input.set_attr("max", max);
        container.append_child(input);
    }
    container
}

/// A facet fieldset: one checkbox per choice, all sharing `field` as their
/// submission name.
pub(crate) fn facet_fieldset(field: &str, choices: &[&str]) -> Element {
    let fieldset = Element::new("fieldset");
    for choice in choices {
        fieldset.append_child(checkbox(field, choice));
    }
    fieldset
}

/// A pagination bar pinned at the viewport top, with next/prev anchors.
pub(crate) fn pagination() -> Element {
    let bar = Element::new("div");
    bar.set_style("top", "0px");
    let prev = Element::new("a");
    prev.set_attr("rel", "prev");
    prev.set_attr("href", "#");
    bar.append_child(prev);
    let next = Element::new("a");
    next.set_attr("rel", "next");
    next.set_attr("href", "#");
    bar.append_child(next);
    bar
}

/// Hydrate a scaffold from parsed querystring filters, silently: element
/// state only, no stream emissions, exactly like markup the server rendered
/// with the state baked in.
pub(crate) fn hydrate(root: &Element, filters: &FilterMap) {
    for (key, value) in filters {
        let values = value.values();
        let matches: Vec<Element> = root
            .named_controls()
            .into_iter()
            .filter(|el| el.attr("name").as_deref() == Some(key.as_str()))
            .collect();

        if matches.is_empty() {
            // Range endpoint encoding: `year -> [start, stop]` fills
            // `year_0` / `year_1`.
            for (index, raw) in values.iter().enumerate() {
                if let Some(end) = root.find_named(&format!("{key}_{index}")) {
                    end.set_value(raw);
                }
            }
            continue;
        }

        for control in matches {
            match control.tag().as_str() {
                "select" => {
                    let Some(first) = values.first() else { continue };
                    // The server renders the requested page/sort as a
                    // concrete option; mirror that when it is missing.
                    if !control
                        .query_tag("option")
                        .iter()
                        .any(|o| o.attr("value").as_deref() == Some(*first))
                    {
                        let option = Element::new("option");
                        option.set_attr("value", first);
                        option.set_text(first);
                        control.append_child(option);
                    }
                    control.set_select_value(first);
                }
                _ if control.attr("type").as_deref() == Some("checkbox") => {
                    if values.iter().any(|v| *v == control.value()) {
                        control.set_checked(true);
                    }
                }
                _ => {
                    if let Some(first) = values.first() {
                        control.set_value(first);
                    }
                }
            }
        }
    }
}
