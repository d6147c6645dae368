//! Scroll-driven sticky behavior and pagination controls.

use super::Component;
use crate::dom::Element;
use crate::rx::{Publisher, Subscription};

/// Class applied while the element is stuck to its configured top.
pub const STUCK_CLASS: &str = "stuck";

/// Direction of an explicit page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    /// Forward one page.
    Next,
    /// Back one page.
    Prev,
}

impl PageDirection {
    /// The wire spelling of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageDirection::Next => "next",
            PageDirection::Prev => "prev",
        }
    }
}

/// A two-state {unstuck, stuck} machine driven purely by position equality.
///
/// Scroll events are coalesced per animation frame rather than by time: a
/// ticking guard ignores scroll events while a frame callback is already
/// scheduled. The frame callback re-reads the element's layout top and
/// compares it to the `top` configured in style at construction.
#[derive(Debug)]
pub struct StickyControls {
    element: Element,
    top: f64,
    ticking: bool,
    stuck: bool,
}

impl StickyControls {
    /// Bind to an element, reading its configured style `top` (pixels, `0`
    /// when unset or not a pixel value).
    pub fn new(element: Element) -> Self {
        let top = element.style_top_px();
        Self {
            element,
            top,
            ticking: false,
            stuck: false,
        }
    }

    /// A window scroll event. Schedules a frame callback unless one is
    /// already pending, in which case the event is ignored.
    pub fn scroll_event(&mut self) {
        self.ticking = true;
    }

    /// The scheduled frame callback: no-op unless a scroll event armed it.
    pub fn frame(&mut self) {
        if !self.ticking {
            return;
        }
        self.ticking = false;
        // Exact equality is the contract: stuck means pinned at the
        // configured offset, not merely near it.
        let at_top = self.element.rect_top() == self.top;
        if at_top && !self.stuck {
            self.element.add_class(STUCK_CLASS);
            self.stuck = true;
        } else if !at_top && self.stuck {
            self.element.remove_class(STUCK_CLASS);
            self.stuck = false;
        }
    }

    /// Whether the element is currently marked stuck.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }
}

impl Component for StickyControls {
    fn element(&self) -> &Element {
        &self.element
    }
}

/// Pagination controls: sticky behavior plus next/prev buttons merged into
/// one `page_changes` stream.
///
/// At construction the next/prev anchors (located by their `rel` attribute)
/// are stripped of navigation: `href` removed, `role=button` set. Their
/// clicks act as button presses, never page jumps.
#[derive(Debug)]
pub struct PageControls {
    sticky: StickyControls,
    next: Option<Element>,
    prev: Option<Element>,
    page_changes: Publisher<PageDirection>,
}

impl PageControls {
    /// Bind to a pagination container.
    pub fn new(element: Element) -> Self {
        let mut next = None;
        let mut prev = None;
        for anchor in element.query_tag("a") {
            match anchor.attr("rel").as_deref() {
                Some("next") => {
                    de_anchor(&anchor);
                    next = Some(anchor);
                }
                Some("prev") => {
                    de_anchor(&anchor);
                    prev = Some(anchor);
                }
                _ => {}
            }
        }
        Self {
            sticky: StickyControls::new(element),
            next,
            prev,
            page_changes: Publisher::new(),
        }
    }

    /// Subscribe to the merged next/prev click stream.
    pub fn subscribe_page_changes(&self) -> Subscription<PageDirection> {
        self.page_changes.subscribe()
    }

    /// A click on the next button; ignored when the scaffold has none.
    pub fn click_next(&self) {
        if self.next.is_some() {
            self.page_changes.publish(PageDirection::Next);
        }
    }

    /// A click on the previous button; ignored when the scaffold has none.
    pub fn click_prev(&self) {
        if self.prev.is_some() {
            self.page_changes.publish(PageDirection::Prev);
        }
    }

    /// A window scroll event (see [`StickyControls::scroll_event`]).
    pub fn scroll_event(&mut self) {
        self.sticky.scroll_event();
    }

    /// The scheduled frame callback (see [`StickyControls::frame`]).
    pub fn frame(&mut self) {
        self.sticky.frame();
    }

    /// Whether the container is currently marked stuck.
    pub fn is_stuck(&self) -> bool {
        self.sticky.is_stuck()
    }
}

impl Component for PageControls {
    fn element(&self) -> &Element {
        self.sticky.element()
    }
}

/// Turn a navigation anchor into a button.
fn de_anchor(anchor: &Element) {
    anchor.remove_attr("href");
    anchor.set_attr("role", "button");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned_element() -> Element {
        let el = Element::new("div");
        el.set_style("top", "12px");
        el.set_rect_top(300.0);
        el
    }

    fn pagination() -> Element {
        let el = pinned_element();
        let next = Element::new("a");
        next.set_attr("rel", "next");
        next.set_attr("href", "?page=2");
        el.append_child(next);
        let prev = Element::new("a");
        prev.set_attr("rel", "prev");
        prev.set_attr("href", "?page=0");
        el.append_child(prev);
        el
    }

    // ===== StickyControls =====

    #[test]
    fn sticks_when_rect_top_reaches_configured_top() {
        let el = pinned_element();
        let mut sticky = StickyControls::new(el.clone());

        el.set_rect_top(12.0);
        sticky.scroll_event();
        sticky.frame();

        assert!(sticky.is_stuck());
        assert!(el.has_class(STUCK_CLASS));
    }

    #[test]
    fn unsticks_when_rect_top_leaves_configured_top() {
        let el = pinned_element();
        let mut sticky = StickyControls::new(el.clone());

        el.set_rect_top(12.0);
        sticky.scroll_event();
        sticky.frame();
        assert!(sticky.is_stuck());

        el.set_rect_top(80.0);
        sticky.scroll_event();
        sticky.frame();

        assert!(!sticky.is_stuck());
        assert!(!el.has_class(STUCK_CLASS));
    }

    #[test]
    fn frame_without_scroll_event_is_inert() {
        let el = pinned_element();
        let mut sticky = StickyControls::new(el.clone());

        el.set_rect_top(12.0);
        sticky.frame();

        assert!(!sticky.is_stuck());
    }

    #[test]
    fn missing_style_top_defaults_to_zero() {
        let el = Element::new("div");
        el.set_rect_top(0.0);
        let mut sticky = StickyControls::new(el);

        sticky.scroll_event();
        sticky.frame();
        assert!(sticky.is_stuck());
    }

    // ===== PageControls =====

    #[tokio::test]
    async fn clicks_merge_into_one_direction_stream() {
        let controls = PageControls::new(pagination());
        let mut changes = controls.subscribe_page_changes();

        controls.click_next();
        controls.click_prev();

        assert_eq!(changes.next().await, Some(PageDirection::Next));
        assert_eq!(changes.next().await, Some(PageDirection::Prev));
        assert_eq!(PageDirection::Next.as_str(), "next");
        assert_eq!(PageDirection::Prev.as_str(), "prev");
    }

    #[test]
    fn buttons_are_de_anchored_at_construction() {
        let el = pagination();
        let _controls = PageControls::new(el.clone());

        for anchor in el.query_tag("a") {
            assert!(!anchor.has_attr("href"));
            assert_eq!(anchor.attr("role").as_deref(), Some("button"));
        }
    }

    #[test]
    fn clicks_without_buttons_are_ignored() {
        let controls = PageControls::new(pinned_element());
        // No subscribers and no buttons: must simply not panic.
        controls.click_next();
        controls.click_prev();
    }
}
