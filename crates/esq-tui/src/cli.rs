use std::path::PathBuf;

use clap::Parser;
use esq_core::core::query::QueryLanguage;
use esq_core::core::session::SessionSettings;
use esq_core::core::time_range::TimeRangePreset;
use esq_core::storage::config::Config;

#[derive(Parser, Debug)]
#[command(name = "esq")]
#[command(about = "Terminal UI for running KQL and ES|QL searches against Elasticsearch")]
#[command(version)]
#[command(after_help = "Examples:
  esq                                   # Use ./esq.toml or ~/.config/esq/config.toml
  esq --index 'logs-*' --language kql   # Start in KQL mode on logs-*
  esq --time-range 24h --size 500       # Wider window, bigger pages
  esq --log-file /tmp/esq.log -v        # Write debug logs to a file

Environment Variables:
  ESQ_URL        Elasticsearch URL (overrides [elasticsearch] hosts)
  ESQ_API_KEY    API key (overrides [elasticsearch] api_key)
  ESQ_PASSWORD   Basic auth password (overrides basic_auth.password)
  ESQ_LOG        Log filter, e.g. 'esq_core=debug' (requires --log-file)")]
pub struct Cli {
    /// Configuration file (default: ./esq.toml, then ~/.config/esq/config.toml)
    #[arg(short, long, env = "ESQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Index pattern to search instead of the configured default_index
    #[arg(short, long)]
    pub index: Option<String>,

    /// Rows per page, capped at query.max_size
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Query language selected at startup (esql or kql)
    #[arg(short, long, default_value = "esql")]
    pub language: QueryLanguage,

    /// Initial time range (15m, 30m, 1h, 3h, 6h, 12h, 24h, 7d, 30d)
    #[arg(short, long, default_value = "15m")]
    pub time_range: TimeRangePreset,

    /// Write logs to this file; the terminal is owned by the UI
    #[arg(long, env = "ESQ_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Session settings from the loaded config with command line overrides applied.
    pub fn session_settings(&self, config: &Config) -> SessionSettings {
        let settings =
            SessionSettings::from_config(config, self.size).with_preset(self.time_range);
        match &self.index {
            Some(index) => settings.with_index(index.clone()),
            None => settings,
        }
    }
}
