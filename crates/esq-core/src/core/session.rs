//! Session controller: query, pagination, viewport and status state.
//!
//! The controller never performs I/O itself. Submitting a query or changing
//! page hands back a [`SearchTicket`]; whoever runs the ticket reports the
//! outcome through [`SessionController::complete`]. Only the ticket issued
//! last is accepted, so a late response to a cancelled search is dropped.

use crate::core::backend::{SearchBackend, dispatch};
use crate::core::query::{
    BackendRequest, QueryLanguage, QuerySpec, ResponseFormat, SearchParams, compile,
};
use crate::core::results::{RawResponse, TabularResult, normalize};
use crate::core::time_range::TimeRangePreset;
use crate::display::{CaptionContext, Grid, Viewport, caption, render_grid};
use crate::error::SearchError;
use crate::storage::config::Config;
use crate::utils::text::truncate_status_message;

pub const CANCELLED_MESSAGE: &str = "Query cancelled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Progress,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusMessage {
    fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Startup parameters for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub index: String,
    pub page_size: usize,
    pub time_field: String,
    pub preset: TimeRangePreset,
    pub response_format: ResponseFormat,
}

impl Default for SessionSettings {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            index: params.index,
            page_size: params.page_size,
            time_field: params.time_field,
            preset: TimeRangePreset::default(),
            response_format: params.response_format,
        }
    }
}

impl SessionSettings {
    /// Settings from the loaded configuration. `page_size` overrides
    /// `query.default_size`; either way the result is capped at `query.max_size`.
    pub fn from_config(config: &Config, page_size: Option<usize>) -> Self {
        Self {
            index: config.default_index.clone(),
            page_size: config.query.effective_page_size(page_size),
            time_field: config.time_field.clone(),
            response_format: config.query.response_format,
            ..Self::default()
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_preset(mut self, preset: TimeRangePreset) -> Self {
        self.preset = preset;
        self
    }
}

/// State the user navigates. Mutated only by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub index: String,
    pub page_offset: usize,
    pub page_size: usize,
    pub current_preset: TimeRangePreset,
    pub last_query: Option<QuerySpec>,
}

/// A compiled request waiting to be run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub id: u64,
    pub request: BackendRequest,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: u64,
    language: QueryLanguage,
    /// Another page of the query whose result is installed.
    page_fetch: bool,
}

#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    time_field: String,
    response_format: ResponseFormat,
    phase: SearchPhase,
    result: TabularResult,
    result_language: QueryLanguage,
    /// Page offset of the installed result; restored when a page fetch fails.
    result_page_offset: usize,
    /// Total hits of `last_query`. Zero until that query has succeeded.
    paging_total: u64,
    has_searched: bool,
    viewport: Viewport,
    status: StatusMessage,
    in_flight: Option<InFlight>,
    next_request_id: u64,
}

impl SessionController {
    pub fn new(settings: SessionSettings) -> Self {
        let status = StatusMessage::new(
            format!(
                "Index: {} | Time Range: {} | Connected to Elasticsearch",
                settings.index, settings.preset
            ),
            StatusLevel::Info,
        );

        Self {
            state: SessionState {
                index: settings.index,
                page_offset: 0,
                page_size: settings.page_size.max(1),
                current_preset: settings.preset,
                last_query: None,
            },
            time_field: settings.time_field,
            response_format: settings.response_format,
            phase: SearchPhase::Idle,
            result: TabularResult::default(),
            result_language: QueryLanguage::default(),
            result_page_offset: 0,
            paging_total: 0,
            has_searched: false,
            viewport: Viewport::default(),
            status,
            in_flight: None,
            next_request_id: 1,
        }
    }

    /// Start a new query from the first page.
    ///
    /// Returns `None`, with no state change, for blank text or while another
    /// search is running.
    pub fn submit_query(&mut self, text: &str, language: QueryLanguage) -> Option<SearchTicket> {
        if self.is_busy() {
            log::debug!("Ignoring submit while a search is in flight");
            return None;
        }
        let spec = QuerySpec::new(text, language)?;

        self.state.page_offset = 0;
        self.state.last_query = Some(spec);
        self.paging_total = 0;
        self.issue_ticket(false)
    }

    /// Fetch the next page of the last KQL query, if there is one.
    pub fn next_page(&mut self) -> Option<SearchTicket> {
        if self.is_busy() || !self.last_query_pages() {
            return None;
        }
        let next = self.state.page_offset + self.state.page_size;
        if next as u64 >= self.paging_total {
            return None;
        }
        self.state.page_offset = next;
        self.issue_ticket(true)
    }

    /// Fetch the previous page of the last KQL query, if not on the first.
    pub fn previous_page(&mut self) -> Option<SearchTicket> {
        if self.is_busy() || !self.last_query_pages() || self.state.page_offset == 0 {
            return None;
        }
        self.state.page_offset = self.state.page_offset.saturating_sub(self.state.page_size);
        self.issue_ticket(true)
    }

    fn last_query_pages(&self) -> bool {
        self.state
            .last_query
            .as_ref()
            .is_some_and(|spec| spec.language().supports_paging())
    }

    fn issue_ticket(&mut self, page_fetch: bool) -> Option<SearchTicket> {
        let spec = self.state.last_query.as_ref()?;
        let language = spec.language();
        let range = self.state.current_preset.resolve();
        let params = SearchParams {
            index: self.state.index.clone(),
            page_offset: self.state.page_offset,
            page_size: self.state.page_size,
            time_field: self.time_field.clone(),
            response_format: self.response_format,
            sort: None,
        };
        let request = compile(spec, Some(&range), &params);

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(InFlight {
            id,
            language,
            page_fetch,
        });
        self.phase = SearchPhase::Submitting;
        self.status = StatusMessage::new(
            format!(
                "⏳ Executing {} query... Please wait (this may take a while)",
                language
            ),
            StatusLevel::Progress,
        );

        log::info!(
            "Search #{} ({}) offset={} preset={}",
            id,
            language,
            self.state.page_offset,
            self.state.current_preset.short_code()
        );
        Some(SearchTicket { id, request })
    }

    /// Install the outcome of ticket `id`. Returns `false` for stale ids.
    pub fn complete(&mut self, id: u64, outcome: Result<RawResponse, SearchError>) -> bool {
        let Some(in_flight) = self.in_flight.filter(|f| f.id == id) else {
            log::debug!("Dropping stale search result #{}", id);
            return false;
        };
        self.in_flight = None;

        match outcome {
            Ok(raw) => {
                self.result = normalize(&raw);
                self.result_language = in_flight.language;
                self.result_page_offset = self.state.page_offset;
                self.paging_total = self.result.total_hits;
                self.has_searched = true;
                self.viewport.reset();
                self.phase = SearchPhase::Success;
                self.status = StatusMessage::new(self.success_text(), StatusLevel::Success);
                log::info!(
                    "Search #{} returned {} rows ({} total)",
                    id,
                    self.result.row_count(),
                    self.result.total_hits
                );
            }
            Err(error) => {
                log::warn!("Search #{} failed: {}", id, error);
                self.fail(&error, in_flight.page_fetch);
            }
        }
        true
    }

    /// Abandon the running search. Returns its id so the caller can stop the task.
    pub fn cancel(&mut self) -> Option<u64> {
        let in_flight = self.in_flight.take()?;
        log::info!("Search #{} cancelled", in_flight.id);
        self.fail(
            &SearchError::Transport(CANCELLED_MESSAGE.to_string()),
            in_flight.page_fetch,
        );
        Some(in_flight.id)
    }

    /// A failed page fetch goes back to the installed page. A failed new
    /// query stays on its first page with nothing to page through.
    fn fail(&mut self, error: &SearchError, page_fetch: bool) {
        if page_fetch {
            self.state.page_offset = self.result_page_offset;
        }
        self.phase = SearchPhase::Failed;
        let message = truncate_status_message(&error.to_string());
        let text = if error.is_query_error() {
            format!("✗ Query error: {}", message)
        } else {
            format!("✗ Error: {}", message)
        };
        self.status = StatusMessage::new(text, StatusLevel::Error);
    }

    fn success_text(&self) -> String {
        match self.result_language {
            QueryLanguage::Esql => format!(
                "✓ ESQL query executed successfully | Time Range: {} | Results: {}",
                self.state.current_preset,
                self.result.row_count()
            ),
            QueryLanguage::Kql => format!(
                "✓ KQL query executed successfully | Index: {} | Time Range: {} | Results: {}",
                self.state.index, self.state.current_preset, self.result.total_hits
            ),
        }
    }

    /// Run a ticket to completion against `backend`.
    pub async fn execute<B>(&mut self, ticket: SearchTicket, backend: &B) -> bool
    where
        B: SearchBackend + ?Sized,
    {
        let outcome = dispatch(backend, &ticket.request).await;
        self.complete(ticket.id, outcome)
    }

    pub fn scroll_left(&mut self) -> bool {
        self.viewport.scroll_left()
    }

    pub fn scroll_right(&mut self) -> bool {
        self.viewport.scroll_right(self.result.column_count())
    }

    /// Select a preset. Takes effect on the next search.
    pub fn set_preset(&mut self, preset: TimeRangePreset) {
        self.state.current_preset = preset;
        if !self.is_busy() {
            self.status = StatusMessage::new(
                format!("Index: {} | Time Range: {}", self.state.index, preset),
                StatusLevel::Info,
            );
        }
    }

    pub fn cycle_preset(&mut self, forward: bool) {
        let current = self.state.current_preset;
        self.set_preset(if forward {
            current.next()
        } else {
            current.previous()
        });
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn result(&self) -> &TabularResult {
        &self.result
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn grid(&self) -> Grid {
        render_grid(&self.result, &self.viewport)
    }

    pub fn caption(&self) -> String {
        caption(&CaptionContext {
            language: self.result_language,
            has_searched: self.has_searched,
            row_count: self.result.row_count(),
            column_count: self.result.column_count(),
            total_hits: self.result.total_hits,
            page_offset: self.result_page_offset,
            viewport_offset: self.viewport.offset(),
        })
    }
}
