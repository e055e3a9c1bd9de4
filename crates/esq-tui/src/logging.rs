//! File logging.
//!
//! The UI owns the terminal, so logs only go to a file and only when one
//! is requested. `log` records from esq-core are bridged into tracing.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::{TuiError, TuiResult};

pub const FILTER_ENV: &str = "ESQ_LOG";

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init(log_file: Option<&Path>, verbose: bool) -> TuiResult<Option<WorkerGuard>> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| TuiError::Logging(format!("invalid log file path: {}", path.display())))?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(Some(guard))
}

/// `ESQ_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    })
}
