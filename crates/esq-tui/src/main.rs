//! esq - Terminal UI for Elasticsearch
//!
//! Type a KQL or ES|QL query, pick a time range and browse the results
//! as a table.

use std::io::{self, stdout};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use esq_core::AppError;
use esq_core::api::client::ElasticsearchClient;
use esq_core::core::backend::SearchBackend;
use esq_core::core::session::SessionController;
use esq_core::storage::config::Config;
use ratatui::backend::CrosstermBackend;

mod action;
mod app;
mod cli;
mod components;
mod error;
mod event;
mod layout;
mod logging;
mod service;

use app::App;
use cli::Cli;
use error::TuiResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::init(cli.log_file.as_deref(), cli.verbose) {
        Ok(guard) => guard,
        Err(err) => return report(&err),
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn report(err: &error::TuiError) -> ExitCode {
    tracing::error!(error = %err, "esq exited with an error");
    eprintln!("Error: {}", err);
    if let Some(hint) = err.hint() {
        eprintln!("Hint: {}", hint);
    }
    ExitCode::FAILURE
}

async fn run(cli: Cli) -> TuiResult<()> {
    // Configuration and connectivity problems are reported before the UI starts.
    let config = Config::load(cli.config.as_deref())?;
    let settings = cli.session_settings(&config);

    let client = ElasticsearchClient::new(&config.elasticsearch)?;
    client.ping().await.map_err(AppError::from)?;
    tracing::info!(
        url = %client.base_url,
        index = %settings.index,
        authenticated = client.is_authenticated(),
        "connected"
    );

    let backend: Arc<dyn SearchBackend> = Arc::new(client);
    let mut app = App::new(SessionController::new(settings), backend, cli.language);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout))?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = app.run_async(&mut terminal).await;

    restore_terminal()?;
    result?;
    Ok(())
}

/// Restore terminal to normal state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
