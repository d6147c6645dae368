//! Error types for the search client.
//!
//! A hierarchical taxonomy built on `thiserror`: domain-specific failures
//! convert into [`AppError`] via `From`, so call sites compose with `?`.
//!
//! Two failure classes deliberately do *not* appear here:
//!
//! - Input validity failures (an out-of-range number, say) are not errors.
//!   They surface only on the `valid` streams of the affected components so
//!   the UI can flag the value without blocking further input.
//! - Missing response headers are not errors either. The pipeline substitutes
//!   the documented defaults (`"0"` total, empty page-label list).

use thiserror::Error;

/// Top-level application error wrapping all fatal failure modes.
///
/// Fetch failures are fatal to the *attempt*, not the application: the page
/// orchestrators log them and keep running, leaving prior results in place.
/// Configuration and wiring failures are fatal at startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// A search or facet request failed.
    #[error("Search request failed: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration could not be loaded or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// A page scaffold was missing a control a component requires.
    #[error("Page wiring error: {0}")]
    Wiring(#[from] WiringError),
}

/// Errors from the asynchronous fetch operations (`get_results`,
/// `get_facets`).
///
/// A failed fetch publishes nothing: no results, no total count, no page
/// labels, no facets. The caller decides what the user sees.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or non-2xx response status.
    ///
    /// Both collapse into `reqwest::Error`; status failures are produced by
    /// checking the response status before any header is read, so a non-2xx
    /// response can never publish partial state.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The facet endpoint returned a body that is not valid JSON.
    #[error("facet payload is not valid JSON: {0}")]
    FacetPayload(#[from] serde_json::Error),
}

/// Errors raised while binding components to a page's element tree.
///
/// These indicate a scaffold that does not match what a component expects,
/// e.g. a range-filter container without its two numeric inputs. They are
/// programming errors in page construction and therefore fatal.
#[derive(Debug, Error)]
pub enum WiringError {
    /// A range-filter container must hold two numeric inputs, addressed
    /// positionally (first = start, second = stop).
    #[error("range filter container needs two numeric inputs, found {found}")]
    RangeInputs {
        /// How many inputs the container actually held.
        found: usize,
    },

    /// A named control expected by an orchestrator was absent.
    #[error("page scaffold is missing control '{name}'")]
    MissingControl {
        /// The `name` attribute that could not be found.
        name: String,
    },
}
