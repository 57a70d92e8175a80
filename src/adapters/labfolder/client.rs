//! Labfolder entry source
//!
//! Implements [`EntrySource`] against the Labfolder REST API v2:
//!
//! | Operation | Request |
//! |---|---|
//! | login | `POST {base}/api/v2/auth/login` with `{"user", "password"}` |
//! | listing | `GET {base}/api/v2/entries?expand=author,project,last_editor&limit&offset` |
//! | metadata | `GET {base}/api/v2/elements/{kind}/{id}` |
//! | payload | metadata URL + `/download` (FILE) or `/original-data` (IMAGE) |
//!
//! The listing total is carried in the `x-total-count` response header.

use crate::adapters::source::{EntryPage, EntrySource};
use crate::config::{secret_string, SecretString, SourceConfig};
use crate::domain::{decode_entries, Element, ElnError, Result, SourceError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Response header carrying the listing total
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Relations expanded on every listing request
const LISTING_EXPAND: &str = "author,project,last_editor";

#[derive(Serialize)]
struct LoginRequest<'a> {
    user: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Labfolder vendor implementation
///
/// # Example
///
/// ```no_run
/// use eln_export::adapters::labfolder::LabfolderSource;
/// use eln_export::config::SourceConfig;
///
/// # async fn example() -> eln_export::domain::Result<()> {
/// let mut source = LabfolderSource::new(SourceConfig::default())?;
/// source.authenticate().await?;
/// # Ok(())
/// # }
/// ```
pub struct LabfolderSource {
    /// Server root, without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Bearer token once authenticated
    token: Option<SecretString>,

    /// Source configuration
    config: SourceConfig,
}

impl LabfolderSource {
    /// Create a new Labfolder source; no request is made until [`authenticate`](Self::authenticate)
    pub fn new(config: SourceConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("eln-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ElnError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url,
            client,
            token: None,
            config,
        })
    }

    /// Obtain the bearer credential
    ///
    /// A configured token is used as-is; otherwise the account credentials are
    /// exchanged for one through the login endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` when neither a token nor a full
    /// username/password pair is available, or when the login is rejected.
    pub async fn authenticate(&mut self) -> Result<()> {
        if self.config.has_token() {
            tracing::info!("Using configured Labfolder token, skipping login");
            self.token = self.config.token.clone();
            return Ok(());
        }

        let (username, password) = match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) if !username.is_empty() => {
                (username.clone(), password.clone())
            }
            _ => {
                return Err(SourceError::AuthenticationFailed(
                    "no token configured and no username/password available".to_string(),
                )
                .into())
            }
        };

        let url = self.api_url("auth/login");
        tracing::info!(user = %username, "Logging in to Labfolder");

        let login = self
            .retry_request(|| async {
                let resp = self
                    .client
                    .post(&url)
                    .json(&LoginRequest {
                        user: &username,
                        password: password.expose_secret().as_ref(),
                    })
                    .send()
                    .await
                    .map_err(map_transport_error)?;

                let resp = check_status(resp).await?;
                resp.json::<LoginResponse>().await.map_err(|e| {
                    ElnError::from(SourceError::InvalidResponse(format!("login response: {e}")))
                })
            })
            .await?;

        self.token = Some(secret_string(login.token));
        Ok(())
    }

    /// Whether a bearer credential is held
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, path)
    }

    fn element_url(&self, element: &Element) -> String {
        self.api_url(&format!(
            "elements/{}/{}",
            element.kind.resource_segment(),
            element.id
        ))
    }

    fn bearer(&self) -> Result<String> {
        self.token
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret().as_ref()))
            .ok_or_else(|| {
                SourceError::AuthenticationFailed("source used before authenticate()".to_string())
                    .into()
            })
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response> {
        let auth = self.bearer()?;
        self.retry_request(|| async {
            let resp = self
                .client
                .get(url)
                .query(query)
                .header(reqwest::header::AUTHORIZATION, &auth)
                .send()
                .await
                .map_err(map_transport_error)?;
            check_status(resp).await
        })
        .await
    }

    /// Retry a request with exponential backoff
    ///
    /// Only transient failures (connection, timeout, 5xx) are retried.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !is_transient(&e) {
                        return Err(e);
                    }

                    let delay_ms = self.config.retry.delay_for_attempt(attempt);
                    crate::log_retry_attempt!(attempt, max_retries, delay_ms, e);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl EntrySource for LabfolderSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<EntryPage> {
        let url = self.api_url("entries");
        let query = [
            ("expand", LISTING_EXPAND.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];

        tracing::debug!(offset, limit, "Fetching entry listing page");
        let resp = self.get(&url, &query).await?;

        let total_count = resp
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<usize>().ok())
            .ok_or_else(|| {
                SourceError::MissingTotalCount(format!(
                    "header {TOTAL_COUNT_HEADER} absent or not a number"
                ))
            })?;

        let records = resp
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("entry listing: {e}")))?;
        let (entries, rejected) = decode_entries(records);

        Ok(EntryPage {
            total_count,
            entries,
            rejected,
        })
    }

    async fn fetch_element_metadata(&self, element: &Element) -> Result<serde_json::Value> {
        let url = self.element_url(element);
        tracing::debug!(url = %url, kind = %element.kind, "Fetching element metadata");

        let resp = self.get(&url, &[]).await?;
        resp.json::<serde_json::Value>().await.map_err(|e| {
            SourceError::InvalidResponse(format!("element {} metadata: {e}", element.id)).into()
        })
    }

    async fn fetch_element_payload(&self, element: &Element) -> Result<Vec<u8>> {
        let suffix = element.kind.payload_suffix().ok_or_else(|| {
            ElnError::Validation(format!("{} elements carry no payload", element.kind))
        })?;
        let url = format!("{}/{}", self.element_url(element), suffix);
        tracing::debug!(url = %url, "Fetching element payload");

        let resp = self.get(&url, &[]).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SourceError::ConnectionFailed(format!("payload body: {e}")))?;
        Ok(bytes.to_vec())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn map_transport_error(e: reqwest::Error) -> ElnError {
    if e.is_timeout() {
        SourceError::Timeout(e.to_string()).into()
    } else {
        SourceError::ConnectionFailed(e.to_string()).into()
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SourceError::from_status(status.as_u16(), body).into())
}

fn is_transient(e: &ElnError) -> bool {
    matches!(
        e,
        ElnError::Source(
            SourceError::ConnectionFailed(_)
                | SourceError::Timeout(_)
                | SourceError::ServerError { .. }
        )
    )
}
