//! Books search page.
//!
//! Keyword search over bibliographic records with a sort select, a
//! publication-year range filter, and a format facet. The richest wiring of
//! the three pages, including the sort rule: a "relevance" option that is
//! only meaningful while a keyword is present.

use super::{
    maybe_sleep, page_label_options, scaffold, step_page, PageCommand, ReloadCoalescer,
};
use crate::controls::filters::parse_query;
use crate::controls::{
    ActiveFilters, ChoiceFacet, Component, HtmlOutput, PageControls, RangeFilter, SelectInput,
    TextInput,
};
use crate::dom::Element;
use crate::form::FacetedSearchForm;
use crate::history::History;
use crate::model::{AppError, FetchError, FilterMap};
use serde_json::Value;
use tokio::sync::mpsc;

/// Class toggled on the range container while the range is invalid.
const ERROR_CLASS: &str = "error";

/// The books search page orchestrator.
#[derive(Debug)]
pub struct BooksSearchPage {
    root: Element,
    form: FacetedSearchForm,
    keyword: TextInput,
    sort: SelectInput,
    years: RangeFilter,
    format: ChoiceFacet,
    page_select: SelectInput,
    pager: PageControls,
    results: HtmlOutput,
    total: HtmlOutput,
    active: ActiveFilters,
    last_facets: Option<Value>,
    last_error: Option<FetchError>,
}

impl BooksSearchPage {
    /// Build the page against `endpoint`, hydrating filter state from the
    /// history's load-time querystring.
    ///
    /// # Errors
    ///
    /// Returns a wiring error when the scaffold does not satisfy a
    /// component's contract.
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime (components spawn their pipelines).
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        history: History,
    ) -> Result<Self, AppError> {
        let root = Element::new("main");

        let form_el = Element::new("form");
        let keyword_el = scaffold::text_input("query");
        let sort_el = scaffold::select(
            "sort",
            &[
                ("relevance", "Relevance"),
                ("title", "Title"),
                ("author", "Author"),
            ],
        );
        let years_el = scaffold::range("pub_year", "1500", "2000");
        let format_el = scaffold::facet_fieldset("format", &["Book", "Periodical", "Article"]);
        let page_el = scaffold::select("page", &[("1", "1")]);
        for el in [&keyword_el, &sort_el, &years_el, &format_el, &page_el] {
            form_el.append_child(el.clone());
        }
        root.append_child(form_el.clone());

        let results_el = Element::new("section");
        let total_el = Element::new("p");
        let pager_el = scaffold::pagination();
        let chips_el = Element::new("div");
        for el in [&results_el, &total_el, &pager_el, &chips_el] {
            root.append_child(el.clone());
        }

        let query = history.current_query();
        let filters = parse_query(&query);
        scaffold::hydrate(&form_el, &filters);

        let page = Self {
            root,
            form: FacetedSearchForm::new(form_el, client, history, endpoint),
            keyword: TextInput::new(keyword_el.clone()),
            sort: SelectInput::new(sort_el),
            years: RangeFilter::new(years_el)?,
            format: ChoiceFacet::new(format_el, "format"),
            page_select: SelectInput::new(page_el),
            pager: PageControls::new(pager_el),
            results: HtmlOutput::new(results_el),
            total: HtmlOutput::new(total_el),
            active: ActiveFilters::new(chips_el, &query),
            last_facets: None,
            last_error: None,
        };

        // Sort rule at load: an explicit sort in the querystring wins, but
        // relevance is never offered without a keyword.
        let has_keyword = !keyword_el.value().trim().is_empty();
        if filters.contains_key("sort") {
            page.sort.set_option_disabled("relevance", !has_keyword);
        } else {
            page.apply_sort_rule(has_keyword);
        }

        Ok(page)
    }

    /// Run the page: one load-time fetch, then the event loop until the
    /// command mailbox closes (pending coalesced reloads are flushed before
    /// returning).
    ///
    /// # Errors
    ///
    /// Wiring failures only; fetch failures are logged, recorded on
    /// [`last_error`](Self::last_error), and leave prior results in place.
    pub async fn run(
        &mut self,
        mut commands: mpsc::UnboundedReceiver<PageCommand>,
    ) -> Result<(), AppError> {
        let mut keyword_states = self.keyword.subscribe();
        let mut sort_values = self.sort.subscribe_value();
        let mut facet_changes = self.format.subscribe_changes();
        let mut range_values = self.years.values().changes();
        let mut range_valid = self.years.valid().changes();
        let mut page_values = self.page_select.subscribe_value();
        let mut page_clicks = self.pager.subscribe_page_changes();
        let mut result_bodies = self.form.search().subscribe_results();
        let mut total_updates = self.form.search().subscribe_total_results();
        let mut label_updates = self.form.search().subscribe_page_labels();
        let mut facet_payloads = self.form.subscribe_facets();

        self.fetch(true).await;

        let mut reload = ReloadCoalescer::default();
        let mut open = true;
        while open || reload.armed() {
            tokio::select! {
                command = commands.recv(), if open => match command {
                    Some(command) => self.apply(command),
                    None => open = false,
                },
                Some(state) = keyword_states.next() => {
                    self.apply_sort_rule(!state.value.trim().is_empty());
                    self.reset_page();
                    reload.filters_changed();
                }
                Some(_) = sort_values.next() => reload.schedule(),
                Some(_) = facet_changes.next() => {
                    self.reset_page();
                    reload.filters_changed();
                }
                Some(_) = range_values.next() => {
                    self.refresh_range_indicator();
                    if self.years.valid().current() {
                        self.reset_page();
                        reload.filters_changed();
                    }
                }
                Some(_) = range_valid.next() => self.refresh_range_indicator(),
                Some(_) = page_values.next() => reload.schedule(),
                Some(direction) = page_clicks.next() => step_page(&self.page_select, direction),
                Some(total) = total_updates.next() => self.show_total(&total),
                Some(labels) = label_updates.next() => {
                    self.page_select.replace_options(page_label_options(&labels));
                }
                Some(body) = result_bodies.next() => self.results.update(&body),
                Some(payload) = facet_payloads.next() => self.apply_facets(payload),
                _ = maybe_sleep(reload.deadline()), if reload.armed() => {
                    let with_facets = reload.fire();
                    self.fetch(with_facets).await;
                }
            }
        }

        // Teardown: apply whatever the last fetch already published.
        while let Some(total) = total_updates.try_next() {
            self.show_total(&total);
        }
        while let Some(labels) = label_updates.try_next() {
            self.page_select.replace_options(page_label_options(&labels));
        }
        while let Some(body) = result_bodies.try_next() {
            self.results.update(&body);
        }
        while let Some(payload) = facet_payloads.try_next() {
            self.apply_facets(payload);
        }
        Ok(())
    }

    /// The results sink's current content.
    pub fn results_html(&self) -> String {
        self.results.content()
    }

    /// The result-count line's current content.
    pub fn total_text(&self) -> String {
        self.total.content()
    }

    /// The most recent facet payload, if any arrived.
    pub fn last_facets(&self) -> Option<&Value> {
        self.last_facets.as_ref()
    }

    /// The most recent fetch failure; cleared by the next success.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Snapshot of the replayed active-filter state.
    pub fn active_filters(&self) -> FilterMap {
        self.active.current()
    }

    fn apply(&mut self, command: PageCommand) {
        match command {
            PageCommand::Keyword(text) => self.keyword.input(&text),
            PageCommand::Sort(value) => self.sort.input(&value),
            PageCommand::ToggleFacet { field, value } => {
                if field == self.format.field() {
                    if !self.format.toggle(&value) {
                        tracing::debug!(%field, %value, "unknown facet choice ignored");
                    }
                } else {
                    tracing::debug!(%field, "facet not present on the books page");
                }
            }
            PageCommand::RangeStart(raw) => self.years.start().input(&raw),
            PageCommand::RangeStop(raw) => self.years.stop().input(&raw),
            PageCommand::SelectPage(page) => self.page_select.input(&page),
            PageCommand::NextPage => self.pager.click_next(),
            PageCommand::PrevPage => self.pager.click_prev(),
            PageCommand::Scroll => self.pager.scroll_event(),
            PageCommand::Frame => self.pager.frame(),
            PageCommand::Reset => self.form.search().form().reset(),
        }
    }

    async fn fetch(&mut self, with_facets: bool) {
        self.results.set_busy(true);
        let outcome = match self.form.search().get_results().await {
            Ok(()) if with_facets => self.form.get_facets().await,
            other => other,
        };
        self.results.set_busy(false);
        match outcome {
            Ok(()) => self.last_error = None,
            Err(error) => {
                tracing::warn!(%error, "fetch failed; keeping previous results");
                self.last_error = Some(error);
            }
        }
    }

    /// Relevance is only offered (and auto-selected) while a keyword is
    /// present; clearing the keyword falls back to the title sort.
    fn apply_sort_rule(&self, has_keyword: bool) {
        if has_keyword {
            self.sort.set_option_disabled("relevance", false);
            self.sort.set_value("relevance");
        } else {
            self.sort.set_option_disabled("relevance", true);
            if self.sort.value() == "relevance" {
                self.sort.set_value("title");
            }
        }
    }

    fn reset_page(&self) {
        if self.page_select.value() != "1" {
            self.page_select.set_value("1");
        }
    }

    fn refresh_range_indicator(&self) {
        if self.years.valid().current() {
            self.years.element().remove_class(ERROR_CLASS);
        } else {
            self.years.element().add_class(ERROR_CLASS);
        }
    }

    fn show_total(&self, total: &str) {
        self.total.update(&format!("{total} results"));
    }

    fn apply_facets(&mut self, payload: Value) {
        self.format.update_counts(&payload);
        self.last_facets = Some(payload);
    }
}

impl Component for BooksSearchPage {
    fn element(&self) -> &Element {
        &self.root
    }
}
