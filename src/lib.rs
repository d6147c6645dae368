//! Reactive search client core for lending-library archives.
//!
//! The crate wraps form controls in composable reactive components that
//! synchronize with a server-side search endpoint: debounced inputs, combined
//! range validity, fetch-then-publish result pipelines, paging, and facet
//! refresh. Components communicate exclusively through push-stream channels;
//! page orchestrators own the wiring.

pub mod config;
pub mod controls;
pub mod dom;
pub mod form;
pub mod history;
pub mod logging;
pub mod model;
pub mod pages;
pub mod rx;
