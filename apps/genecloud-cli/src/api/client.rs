//! HTTP client wrapper for the genecloud API

use crate::config::Configuration;
use crate::error::{CliError, CliResult};
use crate::logging::Redactor;
use crate::models::{Page, PageRequest};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// How requests are authenticated
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: Bearer <jwt>`
    Bearer(String),
    /// `X-API-Key: <key>`
    ApiKey(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Auth::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
        }
    }
}

impl Auth {
    /// Prefer the access token, fall back to the API key
    pub fn from_config(config: &Configuration) -> CliResult<Self> {
        if let Some(token) = &config.access_token {
            return Ok(Auth::Bearer(token.clone()));
        }
        if let Some(key) = &config.api_key {
            tracing::debug!("No access token resolved, authenticating with API key");
            return Ok(Auth::ApiKey(key.clone()));
        }
        config.require_access_token().map(|t| Auth::Bearer(t.to_string()))
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Auth::Bearer(token) => request.bearer_auth(token),
            Auth::ApiKey(key) => request.header("X-API-Key", key),
        }
    }
}

/// API client for making authenticated requests
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
    redactor: Redactor,
}

impl ApiClient {
    /// Create a client authenticated the way the configuration allows
    pub fn new(config: &Configuration) -> CliResult<Self> {
        Self::with_auth(config, Auth::from_config(config)?)
    }

    /// Create a client with explicit credentials
    pub fn with_auth(config: &Configuration, auth: Auth) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("genecloud-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CliError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
            redactor: Redactor::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET returning a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> CliResult<T> {
        let url = self.url(path);
        let request = self.auth.apply(self.client.get(&url).query(query));
        let response = self.send("GET", &url, request).await?;
        response.json().await.map_err(Into::into)
    }

    /// Authenticated GET of one page of a list endpoint
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, String)],
        page: PageRequest,
    ) -> CliResult<Page<T>> {
        let mut query: Vec<(&str, String)> = filters.to_vec();
        query.extend(page.query());
        self.get_json(path, &query).await
    }

    /// Authenticated POST with an optional JSON body, returning a JSON body
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> CliResult<T> {
        let response = self.post(path, body).await?;
        response.json().await.map_err(Into::into)
    }

    /// Authenticated POST whose response body is ignored
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: Option<&B>) -> CliResult<()> {
        self.post(path, body).await.map(|_| ())
    }

    async fn post<B: Serialize>(&self, path: &str, body: Option<&B>) -> CliResult<Response> {
        let url = self.url(path);
        let mut request = self.auth.apply(self.client.post(&url));
        request = match body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_LENGTH, 0),
        };
        self.send("POST", &url, request).await
    }

    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> CliResult<Response> {
        tracing::debug!(method, url = %self.redactor.redact(url), "HTTP request");
        let started = Instant::now();

        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(
            method,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "HTTP response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::trace!(body = %self.redactor.redact(&body), "HTTP error body");
        Err(error_for_status(status, method, url, body))
    }
}

fn error_for_status(status: StatusCode, method: &str, url: &str, body: String) -> CliError {
    if status == StatusCode::NOT_FOUND {
        let path = url::Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| url.to_string());
        return CliError::NotFound(format!("{method} {path}"));
    }

    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };

    CliError::Api {
        status: status.as_u16(),
        message,
    }
}
