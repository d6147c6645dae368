//! Cards search page.
//!
//! Search over lending-card records: a name keyword and a card-year range.
//! The endpoint serves no facet aggregations here, so this page runs on the
//! plain [`SearchForm`], the leanest of the three wirings.

use super::{
    maybe_sleep, page_label_options, scaffold, step_page, PageCommand, ReloadCoalescer,
};
use crate::controls::filters::parse_query;
use crate::controls::{
    ActiveFilters, Component, HtmlOutput, PageControls, RangeFilter, SelectInput, TextInput,
};
use crate::dom::Element;
use crate::form::SearchForm;
use crate::history::History;
use crate::model::{AppError, FetchError, FilterMap};
use tokio::sync::mpsc;

const ERROR_CLASS: &str = "error";

/// The cards search page orchestrator.
#[derive(Debug)]
pub struct CardsSearchPage {
    root: Element,
    form: SearchForm,
    keyword: TextInput,
    years: RangeFilter,
    page_select: SelectInput,
    pager: PageControls,
    results: HtmlOutput,
    total: HtmlOutput,
    active: ActiveFilters,
    last_error: Option<FetchError>,
}

impl CardsSearchPage {
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
        let years_el = scaffold::range("card_year", "1919", "1942");
        let page_el = scaffold::select("page", &[("1", "1")]);
        for el in [&keyword_el, &years_el, &page_el] {
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
        scaffold::hydrate(&form_el, &parse_query(&query));

        Ok(Self {
            root,
            form: SearchForm::new(form_el, client, history, endpoint),
            keyword: TextInput::new(keyword_el),
            years: RangeFilter::new(years_el)?,
            page_select: SelectInput::new(page_el),
            pager: PageControls::new(pager_el),
            results: HtmlOutput::new(results_el),
            total: HtmlOutput::new(total_el),
            active: ActiveFilters::new(chips_el, &query),
            last_error: None,
        })
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
        let mut range_values = self.years.values().changes();
        let mut range_valid = self.years.valid().changes();
        let mut page_values = self.page_select.subscribe_value();
        let mut page_clicks = self.pager.subscribe_page_changes();
        let mut result_bodies = self.form.subscribe_results();
        let mut total_updates = self.form.subscribe_total_results();
        let mut label_updates = self.form.subscribe_page_labels();

        self.fetch().await;

        let mut reload = ReloadCoalescer::default();
        let mut open = true;
        while open || reload.armed() {
            tokio::select! {
                command = commands.recv(), if open => match command {
                    Some(command) => self.apply(command),
                    None => open = false,
                },
                Some(_) = keyword_states.next() => {
                    self.reset_page();
                    reload.schedule();
                }
                Some(_) = range_values.next() => {
                    self.refresh_range_indicator();
                    if self.years.valid().current() {
                        self.reset_page();
                        reload.schedule();
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
                _ = maybe_sleep(reload.deadline()), if reload.armed() => {
                    reload.fire();
                    self.fetch().await;
                }
            }
        }

        while let Some(total) = total_updates.try_next() {
            self.show_total(&total);
        }
        while let Some(labels) = label_updates.try_next() {
            self.page_select.replace_options(page_label_options(&labels));
        }
        while let Some(body) = result_bodies.try_next() {
            self.results.update(&body);
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
            PageCommand::RangeStart(raw) => self.years.start().input(&raw),
            PageCommand::RangeStop(raw) => self.years.stop().input(&raw),
            PageCommand::SelectPage(page) => self.page_select.input(&page),
            PageCommand::NextPage => self.pager.click_next(),
            PageCommand::PrevPage => self.pager.click_prev(),
            PageCommand::Scroll => self.pager.scroll_event(),
            PageCommand::Frame => self.pager.frame(),
            PageCommand::Reset => self.form.form().reset(),
            other => {
                tracing::debug!(command = ?other, "command not applicable to the cards page");
            }
        }
    }

    async fn fetch(&mut self) {
        self.results.set_busy(true);
        let outcome = self.form.get_results().await;
        self.results.set_busy(false);
        match outcome {
            Ok(()) => self.last_error = None,
            Err(error) => {
                tracing::warn!(%error, "fetch failed; keeping previous results");
                self.last_error = Some(error);
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
        self.total.update(&format!("{total} cards"));
    }
}

impl Component for CardsSearchPage {
    fn element(&self) -> &Element {
        &self.root
    }
}
