//! Application action handling.

use esq_core::core::results::RawResponse;
use esq_core::core::session::SearchPhase;
use esq_core::error::SearchError;

use crate::action::AppAction;
use crate::components::Focus;

use super::App;

impl App {
    /// Handle an application action.
    pub(super) fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit => {
                self.abort_search();
                self.should_quit = true;
            }
            AppAction::SubmitQuery => {
                let ticket = self
                    .session
                    .submit_query(self.query_input.text(), self.query_input.language());
                if let Some(ticket) = ticket {
                    self.start_search(ticket);
                }
            }
            AppAction::NextPage => {
                if let Some(ticket) = self.session.next_page() {
                    self.start_search(ticket);
                }
            }
            AppAction::PreviousPage => {
                if let Some(ticket) = self.session.previous_page() {
                    self.start_search(ticket);
                }
            }
            AppAction::CancelSearch => {
                if self.session.cancel().is_some() {
                    self.abort_search();
                }
            }
            AppAction::SearchCompleted(request_id, outcome) => {
                self.handle_search_completed(request_id, outcome);
            }
        }
        self.sync_view();
    }

    fn handle_search_completed(
        &mut self,
        request_id: u64,
        outcome: Result<RawResponse, SearchError>,
    ) {
        if !self.session.complete(request_id, outcome) {
            return;
        }
        self.search_task = None;
        if self.session.phase() == SearchPhase::Success {
            self.results
                .set_view(self.session.grid(), self.session.caption());
            self.results.reset_selection();
            self.set_focus(Focus::Results);
        }
    }
}
