//! TfL Unified API HTTP client.

use serde::de::DeserializeOwned;

use crate::domain::{LineId, StopPointId};
use crate::retry::{self, RetryPolicy};

use super::error::TflError;
use super::types::{DisruptionDto, LineDto, PredictionDto};

/// Default base URL for the TfL Unified API.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Optional `app_key` sent with every request
    pub app_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retry policy applied to every endpoint call
    pub retry: RetryPolicy,
}

impl TflConfig {
    /// Create a config with the default base URL and retry policy.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_key: None,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `app_key` query parameter.
    pub fn with_app_key(mut self, key: impl Into<String>) -> Self {
        self.app_key = Some(key.into());
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for TflConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the TfL Unified API.
///
/// One client (and its connection pool) is shared across all sub-fetches
/// of a report cycle. Each public method runs a typed GET wrapped in the
/// retry policy and returns `None` once the retries are exhausted.
#[derive(Debug, Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: String,
    app_key: Option<String>,
    retry: RetryPolicy,
}

impl TflClient {
    /// Create a new TfL client with the given configuration.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            app_key: config.app_key,
            retry: config.retry,
        })
    }

    /// Current statuses for a line (`GET /Line/{id}/Status`).
    pub async fn line_status(&self, line: &LineId) -> Option<Vec<LineDto>> {
        let url = format!("{}/Line/{}/Status", self.base_url, line.as_str());
        self.get_with_retries(&url, "line status fetch").await
    }

    /// Active disruptions for a line (`GET /Line/{id}/Disruption`).
    pub async fn line_disruptions(&self, line: &LineId) -> Option<Vec<DisruptionDto>> {
        let url = format!("{}/Line/{}/Disruption", self.base_url, line.as_str());
        self.get_with_retries(&url, "disruption fetch").await
    }

    /// Arrival predictions at a stop (`GET /StopPoint/{id}/Arrivals`).
    pub async fn arrivals(&self, stop: &StopPointId) -> Option<Vec<PredictionDto>> {
        let url = format!("{}/StopPoint/{}/Arrivals", self.base_url, stop.as_str());
        self.get_with_retries(&url, "arrivals fetch").await
    }

    /// GET `url` under the retry policy, decoding the JSON body.
    async fn get_with_retries<T: DeserializeOwned>(&self, url: &str, what: &str) -> Option<T> {
        retry::with_retries(&self.retry, what, || async move { self.fetch(url).await }).await
    }

    /// One GET attempt. Non-2xx statuses and undecodable bodies are
    /// errors, so the retry layer treats them like network faults.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, TflError> {
        let mut request = self.http.get(url);
        if let Some(key) = &self.app_key {
            request = request.query(&[("app_key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TflError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TflError::Json {
            message: e.to_string(),
        })
    }
}
