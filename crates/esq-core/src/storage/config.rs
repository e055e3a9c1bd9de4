//! Configuration management
//!
//! TOML file looked up in order: explicit `--config` path, `./esq.toml`,
//! `~/.config/esq/config.toml`. Environment variables (`ESQ_URL`,
//! `ESQ_API_KEY`, `ESQ_PASSWORD`) override the file.

use super::credentials;
use crate::core::query::ResponseFormat;
use crate::error::{ConfigError, StorageError};
use crate::utils::validation::{validate_page_sizes, validate_url};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = "esq.toml";
pub const DEFAULT_HOST: &str = "http://localhost:9200";

/// `hosts` may be a single string or a list of strings.
fn deserialize_hosts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(host) => vec![host],
        OneOrMany::Many(hosts) => hosts,
    })
}

/// Application configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Index pattern searched by KQL queries.
    pub default_index: String,
    /// Timestamp field used for time filtering and sorting.
    pub time_field: String,
    pub elasticsearch: ElasticsearchSettings,
    pub query: QuerySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_index: "*".to_string(),
            time_field: crate::core::query::DEFAULT_TIME_FIELD.to_string(),
            elasticsearch: ElasticsearchSettings::default(),
            query: QuerySettings::default(),
        }
    }
}

/// Connection settings for the cluster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ElasticsearchSettings {
    #[serde(deserialize_with = "deserialize_hosts")]
    pub hosts: Vec<String>,
    /// Prefix scheme-less hosts with `https://` instead of `http://`.
    pub use_ssl: bool,
    pub verify_certs: bool,
    /// PEM bundle added to the trusted roots.
    pub ca_certs: Option<PathBuf>,
    pub api_key: Option<String>,
    pub basic_auth: Option<BasicAuth>,
    /// Connect/ping timeout in seconds. Searches use their own deadlines.
    pub request_timeout: u64,
}

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self {
            hosts: vec![DEFAULT_HOST.to_string()],
            use_ssl: false,
            verify_certs: true,
            ca_certs: None,
            api_key: None,
            basic_auth: None,
            request_timeout: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QuerySettings {
    pub default_size: usize,
    pub max_size: usize,
    /// Body format requested for ES|QL: `json`, `csv` or `tsv`.
    pub response_format: ResponseFormat,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_size: 100,
            max_size: 10_000,
            response_format: ResponseFormat::default(),
        }
    }
}

impl ElasticsearchSettings {
    /// First configured host, with a scheme and without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self
            .hosts
            .first()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST);

        let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else if self.use_ssl {
            format!("https://{}", host)
        } else {
            format!("http://{}", host)
        };

        with_scheme.trim_end_matches('/').to_string()
    }

    /// Basic auth pair, only when both parts are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.basic_auth
            .as_ref()
            .filter(|auth| !auth.username.is_empty() && !auth.password.is_empty())
            .map(|auth| (auth.username.as_str(), auth.password.as_str()))
    }
}

impl QuerySettings {
    /// Page size actually requested: the override or `default_size`, capped at `max_size`.
    pub fn effective_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_size)
            .clamp(1, self.max_size.max(1))
    }
}

impl Config {
    /// Locate, parse, apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = Self::locate(path)?;
        log::debug!("Loading configuration from {}", config_path.display());

        let mut config = Self::from_file(&config_path)?;
        config.apply_overrides(credentials::read_non_empty);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without overrides or validation.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Candidate paths, highest priority first.
    pub fn search_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
        if let Some(path) = explicit {
            return vec![path.to_path_buf()];
        }

        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Ok(user_path) = Self::user_config_path() {
            paths.push(user_path);
        }
        paths
    }

    fn locate(explicit: Option<&Path>) -> crate::Result<PathBuf> {
        let candidates = Self::search_paths(explicit);
        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or_else(|| {
                let searched = candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                ConfigError::FileNotFound { searched }.into()
            })
    }

    fn user_config_path() -> super::Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
        Ok(home_dir.join(".config").join("esq").join("config.toml"))
    }

    /// Apply `ESQ_URL`, `ESQ_API_KEY` and `ESQ_PASSWORD` through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let es = &mut self.elasticsearch;

        if let Some(url) = lookup(credentials::URL_VAR) {
            match es.hosts.first_mut() {
                Some(first) => *first = url,
                None => es.hosts.push(url),
            }
        }

        if let Some(api_key) = lookup(credentials::API_KEY_VAR) {
            es.api_key = Some(api_key);
        }

        if let Some(password) = lookup(credentials::PASSWORD_VAR) {
            es.basic_auth.get_or_insert_with(BasicAuth::default).password = password;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elasticsearch.hosts.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "elasticsearch.hosts".to_string(),
                value: "[]".to_string(),
                reason: "at least one host is required".to_string(),
            });
        }
        validate_url("elasticsearch.hosts", &self.elasticsearch.base_url())?;

        if self.elasticsearch.request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "elasticsearch.request_timeout".to_string(),
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.time_field.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "time_field".to_string(),
                value: self.time_field.clone(),
                reason: "cannot be empty".to_string(),
            });
        }

        validate_page_sizes(self.query.default_size, self.query.max_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("esq.toml");
        fs::write(&path, content).expect("Failed to write config");
        path
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_index, "*");
        assert_eq!(config.time_field, "@timestamp");
        assert_eq!(config.elasticsearch.base_url(), "http://localhost:9200");
        assert_eq!(config.query.default_size, 100);
        assert_eq!(config.query.max_size, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_full_schema() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(
            temp_dir.path(),
            r#"
default_index = "logs-*"
time_field = "event.created"

[elasticsearch]
hosts = ["https://es1:9200/", "https://es2:9200"]
verify_certs = false
api_key = "abc=="
request_timeout = 10

[elasticsearch.basic_auth]
username = "elastic"
password = "changeme"

[query]
default_size = 50
max_size = 500
response_format = "csv"
"#,
        );

        let config = Config::from_file(&path).expect("Failed to load config");
        assert_eq!(config.default_index, "logs-*");
        assert_eq!(config.time_field, "event.created");
        assert_eq!(config.elasticsearch.base_url(), "https://es1:9200");
        assert!(!config.elasticsearch.verify_certs);
        assert_eq!(config.elasticsearch.api_key.as_deref(), Some("abc=="));
        assert_eq!(
            config.elasticsearch.credentials(),
            Some(("elastic", "changeme"))
        );
        assert_eq!(config.query.default_size, 50);
        assert_eq!(config.query.response_format, ResponseFormat::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_host_string_and_use_ssl() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(
            temp_dir.path(),
            "[elasticsearch]\nhosts = \"es.internal:9200\"\nuse_ssl = true\n",
        );

        let config = Config::from_file(&path).expect("Failed to load config");
        assert_eq!(config.elasticsearch.hosts, vec!["es.internal:9200"]);
        assert_eq!(config.elasticsearch.base_url(), "https://es.internal:9200");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(temp_dir.path(), "");
        let config = Config::from_file(&path).expect("Failed to load config");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_response_format_is_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(temp_dir.path(), "[query]\nresponse_format = \"xml\"\n");
        let err = Config::from_file(&path).expect_err("unknown format");
        assert!(matches!(
            err,
            crate::AppError::Config(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = write_config(temp_dir.path(), "default_index = [unclosed");
        let err = Config::from_file(&path).expect_err("invalid TOML");
        assert!(matches!(
            err,
            crate::AppError::Config(ConfigError::Parse { .. })
        ));
        assert!(err.to_string().contains("esq.toml"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nonexistent.toml");

        let err = Config::load(Some(&missing)).expect_err("missing file");
        assert!(matches!(
            err,
            crate::AppError::Config(ConfigError::FileNotFound { .. })
        ));
        assert!(err.to_string().contains("nonexistent.toml"));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config::default();
        config.elasticsearch.basic_auth = Some(BasicAuth {
            username: "elastic".to_string(),
            password: "from-file".to_string(),
        });

        let env: HashMap<&str, &str> = HashMap::from([
            ("ESQ_URL", "https://override:9243"),
            ("ESQ_API_KEY", "env-key"),
            ("ESQ_PASSWORD", "from-env"),
        ]);
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.elasticsearch.base_url(), "https://override:9243");
        assert_eq!(config.elasticsearch.api_key.as_deref(), Some("env-key"));
        assert_eq!(
            config.elasticsearch.credentials(),
            Some(("elastic", "from-env"))
        );
    }

    #[test]
    fn test_password_without_username_is_not_used() {
        let mut config = Config::default();
        config.apply_overrides(|name| (name == "ESQ_PASSWORD").then(|| "pw".to_string()));
        assert_eq!(config.elasticsearch.credentials(), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.query.default_size = 20_000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.elasticsearch.hosts = vec!["ftp://es:21".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.elasticsearch.hosts.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_page_size_is_clamped() {
        let query = QuerySettings {
            default_size: 100,
            max_size: 500,
            response_format: ResponseFormat::default(),
        };
        assert_eq!(query.effective_page_size(None), 100);
        assert_eq!(query.effective_page_size(Some(250)), 250);
        assert_eq!(query.effective_page_size(Some(9_999)), 500);
        assert_eq!(query.effective_page_size(Some(0)), 1);
    }

    #[test]
    fn test_search_paths_order() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(Config::search_paths(Some(&explicit)), vec![explicit]);

        let defaults = Config::search_paths(None);
        assert_eq!(defaults[0], PathBuf::from("esq.toml"));
    }
}
