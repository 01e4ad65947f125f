// Hand-crafted async HTTP client for the proxy telemetry API.
//
// Two read-only endpoints: `/1/summary` and `/1/workers`.
// Auth: optional `Authorization: Bearer <token>` header.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{ProxySummary, WorkerRecord, WorkersSnapshot};

/// Raw `/1/workers` envelope before per-record validation.
#[derive(serde::Deserialize)]
struct RawWorkers {
    workers: Vec<serde_json::Value>,
}

/// Transport options for building the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Async client for the proxy telemetry API.
///
/// Cheap to rebuild: the dashboard constructs a fresh client whenever the
/// operator changes the API URL or access token.
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProxyClient {
    /// Build a client for `base_url`, injecting the bearer token as a
    /// default header when one is set.
    pub fn new(
        base_url: &str,
        token: Option<&SecretString>,
        options: &ClientOptions,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .map_err(|e| Error::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("hashwatch/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse and normalize the base URL so `join("1/summary")` works
    /// whether or not the configured URL carries a trailing slash.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// GET `/1/summary`.
    pub async fn summary(&self) -> Result<ProxySummary, Error> {
        self.get("1/summary", "summary").await
    }

    /// GET `/1/workers`, validating each positional record.
    pub async fn workers(&self) -> Result<WorkersSnapshot, Error> {
        let raw: RawWorkers = self.get("1/workers", "workers").await?;

        let mut workers = Vec::with_capacity(raw.workers.len());
        for (index, value) in raw.workers.into_iter().enumerate() {
            let record: WorkerRecord =
                serde_json::from_value(value).map_err(|e| Error::InvalidRecord {
                    message: format!("record {index}: {e}"),
                })?;
            workers.push(record);
        }

        Ok(WorkersSnapshot { workers })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        endpoint: &'static str,
    ) -> Result<T, Error> {
        let url = self
            .base_url
            .join(path)
            .map_err(Error::InvalidUrl)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            endpoint,
            message: e.to_string(),
            body,
        })
    }
}
