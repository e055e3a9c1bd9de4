//! # esq-core
//!
//! Core library for querying Elasticsearch from the terminal.
//!
//! This crate holds everything `esq-tui` needs that is not terminal drawing:
//! time ranges, query compilation for KQL and ES|QL, result normalization,
//! the horizontal table viewport, and the session controller that ties them
//! together behind the [`core::backend::SearchBackend`] seam.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use esq_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> esq_core::Result<()> {
//!     let config = Config::load(None)?;
//!     let client = ElasticsearchClient::new(&config.elasticsearch)?;
//!
//!     let mut session = SessionController::new(SessionSettings::from_config(&config, None));
//!     if let Some(ticket) = session.submit_query("FROM logs-* | LIMIT 10", QueryLanguage::Esql) {
//!         session.execute(ticket, &client).await;
//!     }
//!     println!("{}", session.caption());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           API Layer                 │  Elasticsearch HTTP client, wire models
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Time ranges, compiler, normalizer, session
//! ├─────────────────────────────────────┤
//! │        Display Layer                │  Column widths, viewport, grid, captions
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  TOML configuration, environment credentials
//! ├─────────────────────────────────────┤
//! │         Utils Layer                 │  Validation, text truncation
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use esq_core::prelude::*;
/// ```
pub mod prelude {
    // Error handling
    pub use crate::Result;
    pub use crate::error::{AppError, SearchError};

    // API client and models
    pub use crate::api::client::ElasticsearchClient;
    pub use crate::api::models::{EsqlResponse, SearchResponse};

    // Core
    pub use crate::core::backend::SearchBackend;
    pub use crate::core::query::{QueryLanguage, QuerySpec};
    pub use crate::core::results::TabularResult;
    pub use crate::core::session::{SearchPhase, SessionController, SessionSettings};
    pub use crate::core::time_range::{ResolvedTimeRange, TimeRangePreset};

    // Display
    pub use crate::display::{Grid, Viewport};

    // Storage
    pub use crate::storage::config::Config;
}

/// Business logic layer.
///
/// - [`core::time_range`]: presets and backend timestamp encoding
/// - [`core::query`]: KQL filter building and ES|QL time filter injection
/// - [`core::results`]: response normalization into a [`core::results::TabularResult`]
/// - [`core::session`]: query, pagination and status state machine
/// - [`core::backend`]: the search backend trait
pub mod core;

/// Storage layer - configuration and credentials.
pub mod storage;

/// Utilities layer - shared helpers.
pub mod utils;

/// API layer - Elasticsearch HTTP client and wire models.
pub mod api;

/// Display layer - column widths, horizontal viewport and result captions.
pub mod display;

/// Error handling - hierarchical error system.
pub mod error;

/// Convenient Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
