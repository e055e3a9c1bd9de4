//! Error types for esq.

use std::io;

use esq_core::AppError;
use thiserror::Error;

/// TUI-specific error type.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Startup failure from the core library.
    #[error(transparent)]
    Core(#[from] AppError),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl TuiError {
    /// Troubleshooting advice printed under the error on exit.
    pub fn hint(&self) -> Option<String> {
        match self {
            TuiError::Core(err) => err.troubleshooting_hint(),
            TuiError::Logging(_) => {
                Some("Check that the log file's directory exists and is writable".to_string())
            }
            TuiError::Terminal(_) => None,
        }
    }
}

/// Result type alias for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;
