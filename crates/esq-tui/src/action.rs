//! Application actions.
//!
//! Key handlers and background search tasks both talk to the app through
//! these, so every state change goes through `App::handle_action`.

use esq_core::core::results::RawResponse;
use esq_core::error::SearchError;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,

    /// Run the query in the editor from the first page
    SubmitQuery,

    NextPage,

    PreviousPage,

    /// Abandon the running search
    CancelSearch,

    /// A search task finished (request_id, outcome)
    SearchCompleted(u64, Result<RawResponse, SearchError>),
}
