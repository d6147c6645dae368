//! Passive display sink.

use super::Component;
use crate::dom::Element;
use crate::rx::{Publisher, Subscription};

/// A display-only component: content is injected into its element, and a
/// stream of its own state lets other code observe what it shows.
///
/// The busy helpers exist so orchestrators can pair every fetch trigger with
/// a completion-or-error handler that clears the flag; the sink itself never
/// touches it.
#[derive(Debug)]
pub struct HtmlOutput {
    element: Element,
    state: Publisher<String>,
}

impl HtmlOutput {
    /// Wrap a display element.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            state: Publisher::new(),
        }
    }

    /// Subscribe to content updates.
    pub fn subscribe(&self) -> Subscription<String> {
        self.state.subscribe()
    }

    /// Inject content and publish the element's resulting state.
    pub fn update(&self, html: &str) {
        self.element.set_text(html);
        self.state.publish(self.element.text());
    }

    /// Current content.
    pub fn content(&self) -> String {
        self.element.text()
    }

    /// Set or clear the `aria-busy` marker.
    pub fn set_busy(&self, busy: bool) {
        if busy {
            self.element.set_attr("aria-busy", "true");
        } else {
            self.element.remove_attr("aria-busy");
        }
    }

    /// Whether the `aria-busy` marker is set.
    pub fn is_busy(&self) -> bool {
        self.element.attr("aria-busy").as_deref() == Some("true")
    }
}

impl Component for HtmlOutput {
    fn element(&self) -> &Element {
        &self.element
    }
}
