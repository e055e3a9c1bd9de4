//! Runs search tickets off the UI task.

use std::sync::Arc;

use esq_core::core::backend::{SearchBackend, dispatch};
use esq_core::core::session::SearchTicket;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::action::AppAction;

/// Shared handle to the backend. Cheap to clone.
#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
}

impl SearchService {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Run `ticket` on a background task and report back on `tx`.
    ///
    /// The returned handle is aborted when the user cancels; a result that
    /// still arrives afterwards is dropped by the session's id check.
    pub fn spawn(&self, ticket: SearchTicket, tx: UnboundedSender<AppAction>) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            tracing::debug!(request_id = ticket.id, "search task started");
            let outcome = dispatch(backend.as_ref(), &ticket.request).await;
            if let Err(err) = &outcome {
                tracing::warn!(request_id = ticket.id, error = %err, "search failed");
            }
            let _ = tx.send(AppAction::SearchCompleted(ticket.id, outcome));
        })
    }
}
