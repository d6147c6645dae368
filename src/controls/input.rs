//! Text and checkbox input components.
//!
//! Both share one write-path rule: `update` first applies the given fields
//! to the live element, then re-reads the element's *actual* value/checked
//! and publishes that. The published state always reflects element truth,
//! never caller intent, so rejected or partial updates surface correctly.

use super::{Component, INPUT_DEBOUNCE};
use crate::dom::Element;
use crate::model::InputState;
use crate::rx::{Debouncer, Publisher, Subscription};

/// A text input whose value stream is debounced and deduplicated.
///
/// Keystrokes feed a 500ms quiet window; only the latest value of a burst is
/// published, and only when it differs from the last published value.
/// External [`update`](TextInput::update)s bypass the window and publish
/// immediately.
#[derive(Debug)]
pub struct TextInput {
    element: Element,
    state: Publisher<InputState>,
    debouncer: Debouncer<String>,
}

impl TextInput {
    /// Wrap a text control.
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime (the debounce window needs a timer).
    pub fn new(element: Element) -> Self {
        let state: Publisher<InputState> = Publisher::new();
        let publisher = state.clone();
        let mut last_published: Option<String> = None;
        let debouncer = Debouncer::new(INPUT_DEBOUNCE, move |value: String| {
            if last_published.as_deref() != Some(value.as_str()) {
                last_published = Some(value.clone());
                publisher.publish(InputState::text(value));
            }
        });
        Self {
            element,
            state,
            debouncer,
        }
    }

    /// Subscribe to published states.
    pub fn subscribe(&self) -> Subscription<InputState> {
        self.state.subscribe()
    }

    /// A user keystroke: the element now holds `text`, and the debounce
    /// window restarts.
    pub fn input(&self, text: &str) {
        self.element.set_value(text);
        self.debouncer.feed(self.element.value());
    }

    /// External write path: apply, re-read element truth, publish
    /// immediately.
    pub fn update(&self, state: InputState) {
        self.element.set_value(&state.value);
        if let Some(checked) = state.checked {
            self.element.set_checked(checked);
        }
        self.state.publish(InputState::text(self.element.value()));
    }

    /// The element's current value.
    pub fn value(&self) -> String {
        self.element.value()
    }
}

impl Component for TextInput {
    fn element(&self) -> &Element {
        &self.element
    }
}

/// A checkbox that publishes `{checked, value}` immediately on every toggle.
///
/// No debounce: boolean facets depend on immediate feedback.
#[derive(Debug)]
pub struct CheckboxInput {
    element: Element,
    state: Publisher<InputState>,
}

impl CheckboxInput {
    /// Wrap a checkbox control.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            state: Publisher::new(),
        }
    }

    /// Subscribe to published states.
    pub fn subscribe(&self) -> Subscription<InputState> {
        self.state.subscribe()
    }

    /// A user toggle: flip the element and publish the result.
    pub fn toggle(&self) {
        let checked = !self.element.checked();
        self.element.set_checked(checked);
        self.publish_current();
    }

    /// External write path: apply, re-read element truth, publish.
    pub fn update(&self, state: InputState) {
        self.element.set_value(&state.value);
        if let Some(checked) = state.checked {
            self.element.set_checked(checked);
        }
        self.publish_current();
    }

    /// Whether the element is currently checked.
    pub fn checked(&self) -> bool {
        self.element.checked()
    }

    /// The element's current value.
    pub fn value(&self) -> String {
        self.element.value()
    }

    fn publish_current(&self) {
        self.state.publish(InputState::checkbox(
            self.element.value(),
            self.element.checked(),
        ));
    }
}

impl Component for CheckboxInput {
    fn element(&self) -> &Element {
        &self.element
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
