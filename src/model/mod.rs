//! Core domain types shared across the crate.
//!
//! Everything here is a transient UI-state value, not a persisted record:
//! control states, range pairs, filter mappings, and the error taxonomy.

pub mod error;
pub mod range;
pub mod state;

pub use error::{AppError, FetchError, WiringError};
pub use range::Range;
pub use state::{FilterMap, FilterValue, InputState, SelectOption};
