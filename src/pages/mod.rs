//! Page orchestrators.
//!
//! One actor per search page (books, cards, members) owning its element
//! scaffold, its form, and its controls. Commands (the stand-in for real
//! user events) arrive on a mailbox; everything else flows through the
//! components' stream channels. The orchestrator is the only place where
//! channels are wired together:
//!
//! - filter changes reset the page to 1, then coalesce into one reload
//!   (results + facets) within a 100ms window;
//! - explicit page changes and sort changes reload results only;
//! - the results sink is `aria-busy` for the duration of every fetch and
//!   cleared on completion or error;
//! - an `error` class on the range container tracks combined range
//!   validity, cleared as soon as the filter is valid again; invalid ranges
//!   gate reloads but never block input.

pub mod books;
pub mod cards;
pub mod members;
pub(crate) mod scaffold;

pub use books::BooksSearchPage;
pub use cards::CardsSearchPage;
pub use members::MembersSearchPage;

use crate::controls::{Component, PageDirection, SelectInput};
use crate::model::SelectOption;
use std::time::Duration;
use tokio::time::Instant;

/// Quiet window coalescing result-reload triggers.
pub const RELOAD_WINDOW: Duration = Duration::from_millis(100);

/// A user-event command delivered to a page's mailbox.
///
/// Pages ignore commands that do not apply to them (a facet toggle on a
/// page without that facet logs and drops).
#[derive(Debug, Clone)]
pub enum PageCommand {
    /// A keystroke burst in the keyword input (debounced path).
    Keyword(String),
    /// A sort selection.
    Sort(String),
    /// A facet checkbox toggle, addressed by facet field and choice value.
    ToggleFacet {
        /// The facet field, e.g. `format`.
        field: String,
        /// The choice value within the field.
        value: String,
    },
    /// A keystroke burst in the range start input.
    RangeStart(String),
    /// A keystroke burst in the range stop input.
    RangeStop(String),
    /// A direct page selection.
    SelectPage(String),
    /// A click on the next-page button.
    NextPage,
    /// A click on the previous-page button.
    PrevPage,
    /// A window scroll event.
    Scroll,
    /// The following animation frame.
    Frame,
    /// A native form reset.
    Reset,
}

/// Pending-reload state: a single deadline plus a facets-dirty marker.
///
/// Every trigger within the window supersedes the deadline; firing yields
/// whether facets must be refreshed along with the results.
#[derive(Debug, Default)]
pub(crate) struct ReloadCoalescer {
    deadline: Option<Instant>,
    facets_dirty: bool,
}

impl ReloadCoalescer {
    /// Schedule (or reschedule) a results reload.
    pub(crate) fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + RELOAD_WINDOW);
    }

    /// A filter changed: facets need refreshing too.
    pub(crate) fn filters_changed(&mut self) {
        self.facets_dirty = true;
        self.schedule();
    }

    /// Whether a reload is pending.
    pub(crate) fn armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, when armed.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and report whether facets were part of the batch.
    pub(crate) fn fire(&mut self) -> bool {
        self.deadline = None;
        std::mem::take(&mut self.facets_dirty)
    }
}

/// Sleep until `deadline`; pend forever when there is none.
pub(crate) async fn maybe_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Build page-select options from server page labels: values are 1-based
/// page numbers, texts the labels.
pub(crate) fn page_label_options(labels: &[String]) -> Vec<SelectOption> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| SelectOption::new((index + 1).to_string(), label.clone()))
        .collect()
}

/// Step the page select one page in `direction`, clamped to the rendered
/// options. The selection change itself triggers the reload.
pub(crate) fn step_page(page_select: &SelectInput, direction: PageDirection) {
    let pages = page_select.element().query_tag("option").len().max(1);
    let current: usize = page_select.value().parse().unwrap_or(1);
    let next = match direction {
        PageDirection::Next => current.saturating_add(1).min(pages),
        PageDirection::Prev => current.saturating_sub(1).max(1),
    };
    if next != current {
        page_select.set_value(&next.to_string());
    }
}
