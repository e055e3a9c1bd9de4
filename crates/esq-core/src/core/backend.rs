//! The search backend seam.
//!
//! The session controller only talks to this trait; the HTTP client in
//! [`crate::api::client`] is the production implementation and tests use
//! in-memory fakes.

use async_trait::async_trait;

use crate::api::models::{EsqlResponse, SearchResponse};
use crate::core::query::{BackendRequest, StructuredSearch, TextQuery};
use crate::core::results::RawResponse;
use crate::error::SearchError;

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a structured search. Fails with `QuerySyntax` or `Transport`.
    async fn execute_structured_search(
        &self,
        search: &StructuredSearch,
    ) -> Result<SearchResponse, SearchError>;

    /// Run an ES|QL query. Fails with `QuerySyntax`, `GatewayTimeout` or `Transport`.
    async fn execute_text_query(&self, query: &TextQuery) -> Result<EsqlResponse, SearchError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), SearchError>;
}

/// Send a compiled request to whichever endpoint handles it.
pub async fn dispatch<B>(backend: &B, request: &BackendRequest) -> Result<RawResponse, SearchError>
where
    B: SearchBackend + ?Sized,
{
    match request {
        BackendRequest::Structured(search) => backend
            .execute_structured_search(search)
            .await
            .map(RawResponse::Structured),
        BackendRequest::Text(query) => backend
            .execute_text_query(query)
            .await
            .map(RawResponse::Text),
    }
}
