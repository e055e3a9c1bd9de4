use crate::core::query::QueryLanguage;
use thiserror::Error;

/// Remediation advice attached to every ES|QL timeout. Short enough that the
/// whole message survives status line truncation.
pub const TIMEOUT_REMEDIATION: &str =
    "Try: a shorter time range, a LIMIT clause, a more specific query, or KQL.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("SearchError: {0}")]
    Search(#[from] SearchError),
}

/// Failures reported by the search backend.
///
/// None of these are fatal once the UI is running: the session controller
/// turns each one into a status line message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The cluster rejected the query (4xx).
    #[error("Invalid {language} query: {reason}")]
    QuerySyntax {
        language: QueryLanguage,
        reason: String,
    },
    /// The piped query ran past the backend's processing time.
    #[error("ES|QL timed out ({detail}). {}", TIMEOUT_REMEDIATION)]
    GatewayTimeout { detail: String },
    /// Connectivity problems, 5xx responses and anything unexpected.
    #[error("{0}")]
    Transport(String),
}

impl SearchError {
    /// Whether the failure was caused by the query text itself.
    pub fn is_query_error(&self) -> bool {
        matches!(self, SearchError::QuerySyntax { .. })
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found (searched: {searched})")]
    FileNotFound { searched: String },
    #[error("Configuration parse error in {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl AppError {
    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Config(ConfigError::FileNotFound { .. }) => Some(
                "Create esq.toml in the current directory or ~/.config/esq/config.toml \
                 (see config.example.toml)"
                    .to_string(),
            ),
            AppError::Config(ConfigError::Parse { .. }) => {
                Some("The configuration file must be a TOML table".to_string())
            }
            AppError::Search(SearchError::Transport(_)) => Some(
                "Check [elasticsearch] hosts and credentials, and that the cluster is reachable"
                    .to_string(),
            ),
            _ => None,
        }
    }
}
