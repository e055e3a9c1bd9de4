use crate::api::models::{EsqlResponse, SearchResponse, error_reason};
use crate::core::backend::SearchBackend;
use crate::core::query::{QueryLanguage, ResponseFormat, StructuredSearch, TextQuery};
use crate::error::{ConfigError, SearchError, StorageError};
use crate::storage::config::ElasticsearchSettings;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Certificate, Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use std::time::Duration;

const USER_AGENT: &str = concat!("esq/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Auth {
    None,
    Basic { username: String, password: String },
    ApiKey(String),
}

#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    pub base_url: String,
    auth: Auth,
    ping_timeout: Duration,
}

impl ElasticsearchClient {
    /// Build a client from the `[elasticsearch]` settings.
    ///
    /// An API key takes precedence over basic auth when both are configured.
    pub fn new(settings: &ElasticsearchSettings) -> crate::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(settings.request_timeout))
            .danger_accept_invalid_certs(!settings.verify_certs);

        if let Some(ca_path) = &settings.ca_certs {
            let pem = std::fs::read(ca_path).map_err(|source| StorageError::FileIo {
                path: ca_path.to_string_lossy().to_string(),
                source,
            })?;
            let certificate = Certificate::from_pem(&pem).map_err(|e| ConfigError::InvalidValue {
                field: "elasticsearch.ca_certs".to_string(),
                value: ca_path.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
            builder = builder.add_root_certificate(certificate);
        }

        if !settings.verify_certs {
            log::warn!("TLS certificate verification is disabled");
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Transport(format!("Failed to initialise HTTP client: {}", e)))?;

        let auth = match (&settings.api_key, settings.credentials()) {
            (Some(key), _) if !key.is_empty() => Auth::ApiKey(key.clone()),
            (_, Some((username, password))) => Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => Auth::None,
        };

        Ok(ElasticsearchClient {
            client,
            base_url: settings.base_url(),
            auth,
            ping_timeout: Duration::from_secs(settings.request_timeout),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth != Auth::None
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.request(method, url);

        match &self.auth {
            Auth::None => request,
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
            Auth::ApiKey(key) => request.header(AUTHORIZATION, format!("ApiKey {}", key)),
        }
    }

    /// `GET /`, used once at startup to fail fast on a bad host or credentials.
    pub async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .build_request(Method::GET, "/")
            .timeout(self.ping_timeout)
            .send()
            .await
            .map_err(|e| {
                SearchError::Transport(format!(
                    "Cannot connect to Elasticsearch at {}: {}",
                    self.base_url, e
                ))
            })?;

        let status = response.status();
        if status.is_success() {
            log::info!("Connected to Elasticsearch at {}", self.base_url);
            return Ok(());
        }

        let reason = failure_reason(response).await;
        Err(SearchError::Transport(format!(
            "Cannot connect to Elasticsearch at {}: HTTP {}: {}",
            self.base_url,
            status.as_u16(),
            reason
        )))
    }

    /// `POST /{index}/_search`
    pub async fn search(&self, search: &StructuredSearch) -> Result<SearchResponse, SearchError> {
        let endpoint = format!("/{}/_search", search.index);
        log::debug!("POST {} from={} size={}", endpoint, search.from, search.size);

        let response = self
            .build_request(Method::POST, &endpoint)
            .query(&[("timeout", format!("{}s", search.timeout_secs))])
            .json(&search.body())
            .timeout(Duration::from_secs(search.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Transport(format!(
                        "Search failed: no response after {}s",
                        search.timeout_secs
                    ))
                } else {
                    SearchError::Transport(format!("Search failed: {}", e))
                }
            })?;

        let status = response.status();

        if status.is_success() {
            response
                .json::<SearchResponse>()
                .await
                .map_err(|e| SearchError::Transport(format!("Search failed: invalid response: {}", e)))
        } else if status.is_client_error() {
            Err(SearchError::QuerySyntax {
                language: QueryLanguage::Kql,
                reason: failure_reason(response).await,
            })
        } else {
            let reason = failure_reason(response).await;
            Err(SearchError::Transport(format!(
                "Search failed: HTTP {}: {}",
                status.as_u16(),
                reason
            )))
        }
    }

    /// `POST /_query?format=...`
    pub async fn query_esql(&self, query: &TextQuery) -> Result<EsqlResponse, SearchError> {
        log::debug!("POST /_query format={}", query.format.as_str());

        let response = self
            .build_request(Method::POST, "/_query")
            .query(&[("format", query.format.as_str())])
            .json(&json!({ "query": query.query }))
            .timeout(Duration::from_secs(query.timeout_secs))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::GatewayTimeout {
                        detail: format!("no response after {}s", query.timeout_secs),
                    }
                } else {
                    SearchError::Transport(format!("ES|QL query failed: {}", e))
                }
            })?;

        let status = response.status();

        if status.is_success() {
            Self::read_esql_body(response, query.format).await
        } else if status == StatusCode::GATEWAY_TIMEOUT {
            Err(SearchError::GatewayTimeout {
                detail: "504 Gateway Timeout".to_string(),
            })
        } else if status.is_client_error() {
            Err(SearchError::QuerySyntax {
                language: QueryLanguage::Esql,
                reason: failure_reason(response).await,
            })
        } else {
            let reason = failure_reason(response).await;
            Err(SearchError::Transport(format!(
                "ES|QL query failed: HTTP {}: {}",
                status.as_u16(),
                reason
            )))
        }
    }

    async fn read_esql_body(
        response: Response,
        format: ResponseFormat,
    ) -> Result<EsqlResponse, SearchError> {
        let invalid = |e: reqwest::Error| {
            SearchError::Transport(format!("ES|QL query failed: invalid response: {}", e))
        };

        match format {
            ResponseFormat::Json => response.json::<EsqlResponse>().await.map_err(invalid),
            ResponseFormat::Csv => Ok(EsqlResponse::from_delimited(
                &response.text().await.map_err(invalid)?,
                ',',
            )),
            ResponseFormat::Tsv => Ok(EsqlResponse::from_delimited(
                &response.text().await.map_err(invalid)?,
                '\t',
            )),
        }
    }
}

/// Backend reason from an error response, falling back to the raw body or the status text.
async fn failure_reason(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_reason(&body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            body.to_string()
        }
    })
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn execute_structured_search(
        &self,
        search: &StructuredSearch,
    ) -> Result<SearchResponse, SearchError> {
        self.search(search).await
    }

    async fn execute_text_query(&self, query: &TextQuery) -> Result<EsqlResponse, SearchError> {
        self.query_esql(query).await
    }

    async fn ping(&self) -> Result<(), SearchError> {
        ElasticsearchClient::ping(self).await
    }
}
