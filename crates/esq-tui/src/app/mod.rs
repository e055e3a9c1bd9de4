//! Application state and the main run loop.
//!
//! ## Module Structure
//! - `mod.rs`: App struct, initialization, and rendering
//! - `action_handler.rs`: AppAction processing
//! - `search_handler.rs`: background search tasks
//! - `input_handler.rs`: keyboard event processing

mod action_handler;
mod input_handler;
mod search_handler;

use std::sync::Arc;

use esq_core::core::backend::SearchBackend;
use esq_core::core::query::QueryLanguage;
use esq_core::core::session::SessionController;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::action::AppAction;
use crate::components::{
    Component, Focus, HelpOverlay, QueryInput, ResultsTable, StatusBar, TimeRangePanel,
};
use crate::event::{Event, EventHandler};
use crate::layout::main::{QUERY_EDITOR_PERCENT, QUERY_SECTION_HEIGHT, STATUS_BAR_HEIGHT};
use crate::layout::timing::TICK_RATE_MS;
use crate::service::SearchService;

/// The main application state.
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Pane receiving keys
    pub(crate) focus: Focus,
    /// Query, paging, viewport and status state
    pub(crate) session: SessionController,
    pub(crate) query_input: QueryInput,
    pub(crate) time_panel: TimeRangePanel,
    pub(crate) results: ResultsTable,
    pub(crate) status_bar: StatusBar,
    pub(crate) service: SearchService,
    /// Action sender for search tasks
    pub(crate) action_tx: mpsc::UnboundedSender<AppAction>,
    action_rx: mpsc::UnboundedReceiver<AppAction>,
    /// Task running the in-flight search, if any
    pub(crate) search_task: Option<JoinHandle<()>>,
    pub(crate) show_help: bool,
}

impl App {
    pub fn new(
        session: SessionController,
        backend: Arc<dyn SearchBackend>,
        language: QueryLanguage,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let status_bar = StatusBar::new(session.status().clone());

        let mut app = Self {
            should_quit: false,
            focus: Focus::default(),
            session,
            query_input: QueryInput::new(language),
            time_panel: TimeRangePanel::default(),
            results: ResultsTable::default(),
            status_bar,
            service: SearchService::new(backend),
            action_tx,
            action_rx,
            search_task: None,
            show_help: false,
        };
        app.sync_view();
        app
    }

    /// Run the main application loop.
    pub async fn run_async(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> std::io::Result<()> {
        let event_handler = EventHandler::new(TICK_RATE_MS);

        while !self.should_quit {
            self.process_actions();

            terminal.draw(|frame| self.draw(frame))?;

            match event_handler.next()? {
                Event::Key(key) => self.handle_key(key.code, key.modifiers),
                Event::Resize(_, _) => {}
                Event::Tick => {}
            }
            // Let spawned searches make progress between polls.
            tokio::task::yield_now().await;
        }

        self.abort_search();
        Ok(())
    }

    /// Process pending actions from the action queue.
    pub(crate) fn process_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.handle_action(action);
        }
    }

    pub(crate) fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.status_bar.set_focus(focus);
    }

    /// Push session state into the components that display it.
    pub(crate) fn sync_view(&mut self) {
        self.status_bar.set_message(self.session.status().clone());
        self.time_panel
            .set_current(self.session.state().current_preset);
        self.results
            .set_view(self.session.grid(), self.session.caption());
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [query_row, results_area, status_area] = Layout::vertical([
            Constraint::Length(QUERY_SECTION_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(frame.area());

        let [editor_area, time_area] = Layout::horizontal([
            Constraint::Percentage(QUERY_EDITOR_PERCENT),
            Constraint::Percentage(100 - QUERY_EDITOR_PERCENT),
        ])
        .areas(query_row);

        let query_focused = self.focus == Focus::Query && !self.show_help;
        let results_focused = self.focus == Focus::Results && !self.show_help;

        self.query_input.draw(frame, editor_area, query_focused);
        self.time_panel.draw(frame, time_area, false);
        self.results.draw(frame, results_area, results_focused);
        self.status_bar.draw(frame, status_area, false);

        if self.show_help {
            HelpOverlay::render(frame, frame.area());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use esq_core::api::models::{EsqlResponse, SearchResponse};
    use esq_core::core::query::{StructuredSearch, TextQuery};
    use esq_core::core::session::{SearchPhase, SessionSettings, StatusLevel};
    use esq_core::core::time_range::TimeRangePreset;
    use esq_core::error::SearchError;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    #[derive(Default)]
    struct MockBackend {
        structured: Mutex<Vec<StructuredSearch>>,
        text: Mutex<Vec<TextQuery>>,
        error: Option<SearchError>,
    }

    #[async_trait]
    impl SearchBackend for MockBackend {
        async fn execute_structured_search(
            &self,
            search: &StructuredSearch,
        ) -> Result<SearchResponse, SearchError> {
            self.structured.lock().unwrap().push(search.clone());
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            Ok(serde_json::from_value(json!({
                "hits": {
                    "total": {"value": 42},
                    "hits": [
                        {"_id": "a", "_index": "logs", "_source": {"status": 500}},
                        {"_id": "b", "_index": "logs", "_source": {"status": 503}}
                    ]
                }
            }))
            .unwrap())
        }

        async fn execute_text_query(&self, query: &TextQuery) -> Result<EsqlResponse, SearchError> {
            self.text.lock().unwrap().push(query.clone());
            if let Some(err) = &self.error {
                return Err(err.clone());
            }
            Ok(serde_json::from_value(json!({
                "columns": [{"name": "host", "type": "keyword"}],
                "values": [["web-1"], ["web-2"], ["web-3"]]
            }))
            .unwrap())
        }

        async fn ping(&self) -> Result<(), SearchError> {
            Ok(())
        }
    }

    fn app_with(backend: Arc<MockBackend>, language: QueryLanguage) -> App {
        let settings = SessionSettings::default().with_index("logs-*");
        App::new(SessionController::new(settings), backend, language)
    }

    fn paged_app(backend: Arc<MockBackend>, page_size: usize) -> App {
        let settings = SessionSettings {
            page_size,
            ..SessionSettings::default().with_index("logs-*")
        };
        App::new(SessionController::new(settings), backend, QueryLanguage::Kql)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(code, KeyModifiers::NONE);
        app.process_actions();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Wait for the spawned search to report back and apply it.
    async fn finish_search(app: &mut App) {
        let action = app.action_rx.recv().await.expect("search task reports back");
        app.handle_action(action);
    }

    #[tokio::test]
    async fn test_kql_submit_runs_search_and_focuses_results() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(Arc::clone(&backend), QueryLanguage::Kql);

        type_text(&mut app, "status:500");
        press(&mut app, KeyCode::Enter);
        assert!(app.session.is_busy());
        assert_eq!(app.status_bar_level(), StatusLevel::Progress);

        finish_search(&mut app).await;
        assert_eq!(app.session.phase(), SearchPhase::Success);
        assert_eq!(app.focus, Focus::Results);
        assert_eq!(app.results.selected(), Some(0));
        assert!(app.session.caption().starts_with("Showing 1-2 of 42 results"));

        let recorded = backend.structured.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].index, "logs-*");
    }

    #[tokio::test]
    async fn test_typing_q_in_query_pane_does_not_quit() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(backend, QueryLanguage::Esql);

        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.query_input.text(), "q");

        app.set_focus(Focus::Results);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_query_pane() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(backend, QueryLanguage::Esql);

        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.process_actions();
        assert!(app.should_quit);
        assert_eq!(app.query_input.text(), "");
    }

    #[tokio::test]
    async fn test_blank_submit_is_ignored() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(Arc::clone(&backend), QueryLanguage::Esql);

        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(!app.session.is_busy());
        assert!(app.search_task.is_none());
        assert_eq!(app.focus, Focus::Query);
    }

    #[tokio::test]
    async fn test_f2_toggles_language_used_for_submit() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(Arc::clone(&backend), QueryLanguage::Kql);

        press(&mut app, KeyCode::F(2));
        assert_eq!(app.query_input.language(), QueryLanguage::Esql);

        type_text(&mut app, "FROM logs | LIMIT 3");
        press(&mut app, KeyCode::Enter);
        finish_search(&mut app).await;

        assert_eq!(backend.text.lock().unwrap().len(), 1);
        assert!(backend.structured.lock().unwrap().is_empty());
        assert_eq!(app.session.result().row_count(), 3);
    }

    #[tokio::test]
    async fn test_next_page_from_results_pane() {
        let backend = Arc::new(MockBackend::default());
        let mut app = paged_app(Arc::clone(&backend), 2);

        type_text(&mut app, "status:500");
        press(&mut app, KeyCode::Enter);
        finish_search(&mut app).await;

        press(&mut app, KeyCode::Char('n'));
        finish_search(&mut app).await;

        {
            let recorded = backend.structured.lock().unwrap();
            assert_eq!(recorded.len(), 2);
            assert_eq!(recorded[1].from, 2);
        }

        press(&mut app, KeyCode::Char('p'));
        finish_search(&mut app).await;
        assert_eq!(backend.structured.lock().unwrap()[2].from, 0);
        assert!(app.session.caption().starts_with("Showing 1-2 of 42 results"));
    }

    #[tokio::test]
    async fn test_cancel_drops_late_result() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(backend, QueryLanguage::Kql);

        type_text(&mut app, "status:500");
        press(&mut app, KeyCode::Enter);
        app.set_focus(Focus::Results);
        press(&mut app, KeyCode::Esc);

        assert!(!app.session.is_busy());
        assert!(app.search_task.is_none());
        assert_eq!(app.session.phase(), SearchPhase::Failed);
        assert_eq!(app.session.status().text, "✗ Error: Query cancelled");

        // The stale outcome of the abandoned request changes nothing.
        app.handle_action(AppAction::SearchCompleted(1, Err(SearchError::Transport("late".into()))));
        assert_eq!(app.session.status().text, "✗ Error: Query cancelled");
    }

    #[tokio::test]
    async fn test_search_error_reaches_status_bar() {
        let backend = Arc::new(MockBackend {
            error: Some(SearchError::QuerySyntax {
                language: QueryLanguage::Kql,
                reason: "Failed to parse query".to_string(),
            }),
            ..MockBackend::default()
        });
        let mut app = app_with(backend, QueryLanguage::Kql);

        type_text(&mut app, "status:");
        press(&mut app, KeyCode::Enter);
        finish_search(&mut app).await;

        assert_eq!(app.status_bar_level(), StatusLevel::Error);
        assert!(app.session.status().text.starts_with("✗ Query error: Invalid KQL query"));
        assert_eq!(app.focus, Focus::Query);
    }

    #[tokio::test]
    async fn test_time_range_cycles_from_results_pane() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(backend, QueryLanguage::Kql);
        app.set_focus(Focus::Results);

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.session.state().current_preset, TimeRangePreset::Last30Minutes);
        press(&mut app, KeyCode::Char('T'));
        press(&mut app, KeyCode::Char('T'));
        assert_eq!(app.session.state().current_preset, TimeRangePreset::Last30Days);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(backend, QueryLanguage::Kql);
        app.set_focus(Focus::Results);

        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_draw_full_screen() {
        let backend = Arc::new(MockBackend::default());
        let mut app = app_with(backend, QueryLanguage::Esql);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Query"));
        assert!(content.contains("> Last 15 minutes"));
        assert!(content.contains("No results"));
        assert!(content.contains("Connected to Elasticsearch"));
    }

    impl App {
        fn status_bar_level(&self) -> StatusLevel {
            self.session.status().level
        }
    }
}
