//! Background search task management.

use esq_core::core::session::SearchTicket;

use super::App;

impl App {
    /// Spawn `ticket` and remember its task so it can be cancelled.
    pub(super) fn start_search(&mut self, ticket: SearchTicket) {
        self.abort_search();
        let handle = self.service.spawn(ticket, self.action_tx.clone());
        self.search_task = Some(handle);
    }

    /// Stop the running search task, if any.
    pub(super) fn abort_search(&mut self) {
        if let Some(handle) = self.search_task.take() {
            handle.abort();
        }
    }
}
