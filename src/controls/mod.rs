//! Reactive wrappers around form controls.
//!
//! Each component wraps exactly one element (or one container) and exposes
//! push-stream channels as its only integration surface. Composition, not
//! inheritance: [`RangeFilter`] embeds two [`NumberInput`]s, [`PageControls`]
//! embeds [`StickyControls`], facets embed [`CheckboxInput`]s.

pub mod facet;
pub mod filters;
pub mod input;
pub mod number;
pub mod output;
pub mod paging;
pub mod range_filter;
pub mod select;

pub use facet::{BooleanFacet, ChoiceFacet};
pub use filters::ActiveFilters;
pub use input::{CheckboxInput, TextInput};
pub use number::NumberInput;
pub use output::HtmlOutput;
pub use paging::{PageControls, PageDirection, StickyControls};
pub use range_filter::RangeFilter;
pub use select::SelectInput;

use crate::dom::Element;
use std::time::Duration;

/// Quiet period for debounced input streams.
pub const INPUT_DEBOUNCE: Duration = Duration::from_millis(500);

/// The minimal capability every control shares: it wraps an element.
pub trait Component {
    /// The element this component owns.
    fn element(&self) -> &Element;
}
