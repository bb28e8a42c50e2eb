//! # Search autocomplete widget
//!
//! Drives the book search box: suggestions while typing, the three
//! recommendation buttons, and the page-load cosmetics.
//!
//! ```text
//! input event ──► begin (sync: trim, seq += 1) ──► SearchEndpoint::search ──► apply (render | hide)
//!                                                                           ▲
//!                                  drop if a newer event was already applied ┘
//! ```
//!
//! Choosing a suggestion and clicking outside the list count as applied
//! events too, so a late response cannot reopen a dismissed list.
//!
//! Every DOM touch goes through the `View` trait using handles resolved once
//! in `mount`. Delayed class changes run as tokio tasks that `unmount`
//! aborts; without a current runtime they are skipped with a warning.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::view::{Bindings, ElementHandle, View};
use crate::{
    config::{Config, UiOptions},
    error::{MountError, SearchError},
    models::{BookSummary, SearchState},
    services::{HttpSearchEndpoint, SearchEndpoint},
};

pub const ENTRANCE_CLASS: &str = "animate-fadeInUp";
pub const ATTENTION_CLASS: &str = "animate-pulse";
pub const INVALID_INPUT_CLASS: &str = "animate-shake";
pub const SEARCH_FAILED_NOTICE: &str = "Suggestions are unavailable right now";

/// What happened to one input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteOutcome {
    /// Query shorter than the minimum; list hidden, nothing requested
    TooShort,
    /// Rows rendered, with their count
    Rendered(usize),
    /// Endpoint returned nothing; list hidden
    NoMatches,
    /// A newer event had already been applied; response dropped
    Stale,
    /// Request failed; list hidden
    Failed(SearchError),
}

/// Where a document-level click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Element(ElementHandle),
    /// A suggestion row inside the results list, by index
    ResultRow(usize),
}

#[derive(Debug, Default)]
struct Inner {
    state: SearchState,
    results: Vec<BookSummary>,
    /// Sequence number handed to the most recent input event
    issued_seq: u64,
    /// Sequence number of the newest event whose effect is on screen
    applied_seq: u64,
}

pub struct SearchAutocompleteUI {
    view: Arc<dyn View>,
    endpoint: Arc<dyn SearchEndpoint>,
    options: UiOptions,
    bindings: Bindings,
    inner: Mutex<Inner>,
    timers: Mutex<Vec<JoinHandle<()>>>,
}

impl SearchAutocompleteUI {
    /// Binds to the view and runs the page-load steps: restore a search term
    /// left in the field, stagger the developer cards, activate tooltips.
    pub fn mount(
        view: Arc<dyn View>,
        endpoint: Arc<dyn SearchEndpoint>,
        options: UiOptions,
    ) -> Result<Self, MountError> {
        let bindings = Bindings::resolve(view.as_ref())?;

        let ui = Self {
            view,
            endpoint,
            options,
            bindings,
            inner: Mutex::new(Inner::default()),
            timers: Mutex::new(Vec::new()),
        };

        ui.restore_search_term();
        ui.animate_developer_cards();
        ui.activate_tooltips();

        tracing::debug!(
            cards = ui.bindings.developer_cards.len(),
            tooltips = ui.bindings.tooltip_targets.len(),
            "Search widget mounted"
        );

        Ok(ui)
    }

    /// Mounts against the HTTP endpoint named in `config`, with widget
    /// options read from `AUTOCOMPLETE_*` environment variables
    pub fn mount_from_env(view: Arc<dyn View>, config: &Config) -> anyhow::Result<Self> {
        let options = UiOptions::from_env()?;
        let endpoint = HttpSearchEndpoint::from_config(config)?;

        tracing::info!(
            endpoint = %config.search_endpoint_url,
            timeout_secs = config.request_timeout_secs,
            "Mounting search widget"
        );

        Ok(Self::mount(view, Arc::new(endpoint), options)?)
    }

    /// Cancels pending animation timers. In-flight searches are left alone;
    /// their results still land on the view if it outlives the widget.
    pub fn unmount(&self) {
        for timer in self.timers.lock().drain(..) {
            timer.abort();
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn state(&self) -> SearchState {
        self.inner.lock().state.clone()
    }

    /// Suggestions currently backing the rendered rows
    pub fn results(&self) -> Vec<BookSummary> {
        self.inner.lock().results.clone()
    }

    pub fn focus_search(&self) {
        self.view.focus(self.bindings.search_input);
    }

    pub fn validate_search(&self) -> bool {
        !self.search_term().is_empty()
    }

    pub fn show_recommend_buttons(&self) {
        let term = self.search_term();

        if term.is_empty() {
            let input = self.bindings.search_input;
            self.view.add_class(input, INVALID_INPUT_CLASS);
            self.schedule(self.options.invalid_flash(), move |view| {
                view.remove_class(input, INVALID_INPUT_CLASS);
            });
            return;
        }

        self.reveal_recommendations(&term);
        self.view.add_class(self.bindings.recommend_buttons, ENTRANCE_CLASS);

        let button = self.bindings.hybrid_button;
        self.schedule(self.options.attention_delay(), move |view| {
            view.add_class(button, ATTENTION_CLASS);
        });
    }

    /// Handles one input event on the search field
    ///
    /// The field is read and the event numbered when this is called, not when
    /// the returned future is first polled, so several events can be in
    /// flight at once and still be ordered by when they happened.
    pub fn on_input(&self) -> impl Future<Output = AutocompleteOutcome> + Send + '_ {
        let request = self.begin_search();

        async move {
            let Some((seq, query)) = request else {
                return AutocompleteOutcome::TooShort;
            };
            let response = self.endpoint.search(&query).await;
            self.apply_response(seq, &query, response)
        }
    }

    /// Click on a suggestion row. Returns the chosen book, or `None` when the
    /// index does not match a rendered row.
    pub fn on_result_click(&self, index: usize) -> Option<BookSummary> {
        let book = self.inner.lock().results.get(index).cloned()?;

        self.view.set_value(self.bindings.search_input, &book.title);
        self.supersede_pending();
        self.hide_results();
        self.reveal_recommendations(&book.title);

        tracing::debug!(title = %book.title, "Suggestion selected");
        Some(book)
    }

    /// Document-level click; hides the suggestions unless the click landed
    /// on the search field or inside the list. Returns whether it dismissed.
    pub fn on_document_click(&self, target: ClickTarget) -> bool {
        let keep = match target {
            ClickTarget::ResultRow(_) => true,
            ClickTarget::Element(element) => {
                element == self.bindings.search_input
                    || self.view.contains(self.bindings.search_results, element)
            }
        };

        if !keep {
            self.supersede_pending();
            self.hide_results();
        }
        !keep
    }

    /// Marks a dismissal as the newest applied event, so responses to
    /// earlier input cannot reopen the list
    fn supersede_pending(&self) {
        let mut inner = self.inner.lock();
        inner.issued_seq += 1;
        inner.applied_seq = inner.issued_seq;
    }

    fn search_term(&self) -> String {
        self.view.value(self.bindings.search_input).trim().to_string()
    }

    fn begin_search(&self) -> Option<(u64, String)> {
        let query = self.search_term();
        let mut inner = self.inner.lock();
        inner.issued_seq += 1;
        let seq = inner.issued_seq;
        inner.state.query_text = query.clone();

        if query.chars().count() < self.options.min_query_chars {
            inner.applied_seq = seq;
            drop(inner);
            self.view.set_notice(self.bindings.search_input, None);
            self.hide_results();
            return None;
        }

        tracing::debug!(seq, query = %query, "Requesting suggestions");
        Some((seq, query))
    }

    fn apply_response(
        &self,
        seq: u64,
        query: &str,
        response: Result<Vec<BookSummary>, SearchError>,
    ) -> AutocompleteOutcome {
        let mut inner = self.inner.lock();
        if self.options.discard_stale_responses && seq < inner.applied_seq {
            tracing::debug!(
                seq,
                applied = inner.applied_seq,
                query = %query,
                "Dropping stale suggestions"
            );
            return AutocompleteOutcome::Stale;
        }
        inner.applied_seq = inner.applied_seq.max(seq);

        let list = self.bindings.search_results;
        let input = self.bindings.search_input;

        match response {
            Ok(books) => {
                self.view.set_notice(input, None);
                self.view.render_rows(list, &books);
                let count = books.len();
                inner.results = books;
                inner.state.results_visible = count > 0;
                self.view.set_visible(list, count > 0);

                tracing::debug!(seq, query = %query, results = count, "Suggestions applied");
                if count > 0 {
                    AutocompleteOutcome::Rendered(count)
                } else {
                    AutocompleteOutcome::NoMatches
                }
            }
            Err(e) => {
                tracing::warn!(seq, query = %query, error = %e, "Search request failed");
                inner.state.results_visible = false;
                self.view.set_visible(list, false);
                if self.options.show_error_notice {
                    self.view.set_notice(input, Some(SEARCH_FAILED_NOTICE));
                }
                AutocompleteOutcome::Failed(e)
            }
        }
    }

    fn hide_results(&self) {
        self.inner.lock().state.results_visible = false;
        self.view.set_visible(self.bindings.search_results, false);
    }

    fn reveal_recommendations(&self, title: &str) {
        for field in self.bindings.dependent_fields {
            self.view.set_value(field, title);
        }
        self.view.set_visible(self.bindings.recommend_buttons, true);
        self.inner.lock().state.recommend_targets_visible = true;
    }

    fn restore_search_term(&self) {
        let term = self.search_term();
        if !term.is_empty() {
            tracing::debug!(term = %term, "Restoring search term");
            self.reveal_recommendations(&term);
        }
    }

    fn animate_developer_cards(&self) {
        let stagger = self.options.card_stagger();
        for (index, card) in self.bindings.developer_cards.iter().enumerate() {
            self.view.set_animation_delay(*card, stagger * index as u32);
            self.view.add_class(*card, ENTRANCE_CLASS);
        }
    }

    fn activate_tooltips(&self) {
        for target in &self.bindings.tooltip_targets {
            self.view.activate_tooltip(*target);
        }
    }

    fn schedule(&self, delay: Duration, action: impl FnOnce(&dyn View) + Send + 'static) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(?delay, "No tokio runtime; skipping delayed animation");
            return;
        };

        let view = Arc::clone(&self.view);
        let timer = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action(view.as_ref());
        });

        let mut timers = self.timers.lock();
        timers.retain(|t| !t.is_finished());
        timers.push(timer);
    }
}

impl Drop for SearchAutocompleteUI {
    fn drop(&mut self) {
        self.unmount();
    }
}
