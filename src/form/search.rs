//! Search fetch pipelines.
//!
//! [`SearchForm::get_results`] is a strict sequential pipeline over one
//! response (status check, total-count header, page-labels header, body,
//! history push, in that order), so header-derived state always publishes
//! before the body for the same response. [`FacetedSearchForm::get_facets`]
//! is a parallel, independent operation; the page orchestrator decides when
//! each is triggered.
//!
//! In-flight requests are never aborted when superseded. A later request's
//! response can resolve before an earlier one's, so consumers treat the
//! last-*resolved* response as current; the debug logs here carry the
//! serialized state of each attempt to make out-of-order resolution
//! diagnosable.

use super::ReactiveForm;
use crate::controls::Component;
use crate::dom::Element;
use crate::history::History;
use crate::model::FetchError;
use crate::rx::{Publisher, Subscription};
use serde_json::Value;

/// Response header carrying the total result count as a decimal string.
pub const TOTAL_RESULTS_HEADER: &str = "X-Total-Results";

/// Response header carrying the `|`-delimited ordered page labels.
pub const PAGE_LABELS_HEADER: &str = "X-Page-Labels";

/// Delimiter between page labels in [`PAGE_LABELS_HEADER`].
const PAGE_LABEL_DELIMITER: char = '|';

/// A form bound to the search endpoint, with observable result state.
///
/// Three independent hot streams: `results` (the raw HTML fragment),
/// `total_results` (the count header's decimal string, `"0"` when absent),
/// and `page_labels` (empty when absent). There is no merged snapshot;
/// consumers subscribe to what they need.
#[derive(Debug)]
pub struct SearchForm {
    form: ReactiveForm,
    client: reqwest::Client,
    history: History,
    base_url: String,
    results: Publisher<String>,
    total_results: Publisher<String>,
    page_labels: Publisher<Vec<String>>,
}

impl SearchForm {
    /// Bind a form element to the endpoint at `base_url`.
    ///
    /// The client and history are injected; the form owns neither.
    pub fn new(
        element: Element,
        client: reqwest::Client,
        history: History,
        base_url: impl Into<String>,
    ) -> Self {
        let fallback_target = history.path();
        Self {
            form: ReactiveForm::new(element, fallback_target),
            client,
            history,
            base_url: base_url.into(),
            results: Publisher::new(),
            total_results: Publisher::new(),
            page_labels: Publisher::new(),
        }
    }

    /// The embedded form wrapper.
    pub fn form(&self) -> &ReactiveForm {
        &self.form
    }

    /// Serialize the current form state (see [`ReactiveForm::serialize`]).
    pub fn serialize(&self) -> String {
        self.form.serialize()
    }

    /// Subscribe to result-fragment updates.
    pub fn subscribe_results(&self) -> Subscription<String> {
        self.results.subscribe()
    }

    /// Subscribe to total-count updates.
    pub fn subscribe_total_results(&self) -> Subscription<String> {
        self.total_results.subscribe()
    }

    /// Subscribe to page-label updates.
    pub fn subscribe_page_labels(&self) -> Subscription<Vec<String>> {
        self.page_labels.subscribe()
    }

    /// Fetch results for the current form state and publish them.
    ///
    /// The pipeline is strictly sequential over the one response:
    ///
    /// 1. GET `target?state` with ajax headers; any transport failure or
    ///    non-2xx status returns here, publishing nothing;
    /// 2. publish the total-count header (`"0"` when absent);
    /// 3. publish the page-labels header (empty list when absent);
    /// 4. publish the body as results iff non-empty;
    /// 5. push the serialized state into history.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or non-2xx status.
    pub async fn get_results(&self) -> Result<(), FetchError> {
        let (query, request) = self.ajax_request("text/html, */*");
        tracing::debug!(query = %query, "results fetch started");
        let response = request.send().await?.error_for_status()?;

        let total = header_string(&response, TOTAL_RESULTS_HEADER)
            .unwrap_or_else(|| "0".to_string());
        self.total_results.publish(total);

        let labels: Vec<String> = header_string(&response, PAGE_LABELS_HEADER)
            .map(|raw| {
                raw.split(PAGE_LABEL_DELIMITER)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        self.page_labels.publish(labels);

        let body = response.text().await?;
        if !body.is_empty() {
            self.results.publish(body);
        }

        self.history.push(query.clone());
        tracing::debug!(query = %query, "results fetch finished");
        Ok(())
    }

    /// Build the ajax GET request for the current form state.
    pub(crate) fn ajax_request(&self, accept: &str) -> (String, reqwest::RequestBuilder) {
        let query = self.serialize();
        let url = format!("{}{}?{}", self.base_url, self.form.target(), query);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .header("X-Requested-With", "XMLHttpRequest");
        (query, request)
    }
}

impl Component for SearchForm {
    fn element(&self) -> &Element {
        self.form.element()
    }
}

/// A search form whose endpoint also serves facet aggregations as JSON.
///
/// Facets and results are fetched and published independently.
#[derive(Debug)]
pub struct FacetedSearchForm {
    search: SearchForm,
    facets: Publisher<Value>,
}

impl FacetedSearchForm {
    /// Bind a form element to a facet-capable endpoint.
    pub fn new(
        element: Element,
        client: reqwest::Client,
        history: History,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            search: SearchForm::new(element, client, history, base_url),
            facets: Publisher::new(),
        }
    }

    /// The embedded search form (results pipeline, serialization, streams).
    pub fn search(&self) -> &SearchForm {
        &self.search
    }

    /// Subscribe to facet-payload updates.
    pub fn subscribe_facets(&self) -> Subscription<Value> {
        self.facets.subscribe()
    }

    /// Fetch the facet payload for the current form state and publish it
    /// when non-null.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, non-2xx status, or a
    /// body that is not valid JSON.
    pub async fn get_facets(&self) -> Result<(), FetchError> {
        let (query, request) = self.search.ajax_request("application/json");
        tracing::debug!(query = %query, "facet fetch started");
        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        if !payload.is_null() {
            self.facets.publish(payload);
        }
        tracing::debug!(query = %query, "facet fetch finished");
        Ok(())
    }
}

impl Component for FacetedSearchForm {
    fn element(&self) -> &Element {
        self.search.element()
    }
}

fn header_string(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
