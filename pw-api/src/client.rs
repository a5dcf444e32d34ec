//! HTTP client for the Pushwoosh JSON API.
//!
//! Handles request envelope construction, credential injection, bounded
//! retry with exponential backoff and jitter, response classification, and
//! request/response diagnostics.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use pw_core::config::ClientConfig;
use pw_core::constants;
use pw_core::error::{PwError, PwResult};

/// Retry configuration for HTTP requests.
///
/// Only transient conditions are retried: connect failures, timeouts, and
/// the listed status codes. Client errors (4xx) and success statuses with
/// undecodable bodies fail immediately.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial try.
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            retryable_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries. Useful for non-idempotent calls
    /// where replaying a transient failure is worse than surfacing it.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Snapshot of the most recent request/response exchange.
///
/// Purely observational; overwritten on every call. Not meaningful across
/// concurrent calls on a shared client.
#[derive(Debug, Clone)]
pub struct LastExchange {
    /// Full request URL.
    pub url: String,
    /// Serialized request envelope.
    pub request_body: String,
    /// HTTP status of the response, if one was received.
    pub status: Option<u16>,
    /// Raw response body text, if one was received.
    pub response_text: Option<String>,
    /// Decoded response JSON, if decoding succeeded.
    pub response_json: Option<Value>,
}

/// Client for the primary Pushwoosh JSON API.
///
/// Endpoint and credential are fixed at construction. Every endpoint method
/// builds a request body and delegates to [`PushwooshClient::send`].
#[derive(Clone)]
pub struct PushwooshClient {
    inner: Client,
    /// Base endpoint URL (no trailing slash).
    api_endpoint: String,
    /// API token injected as the `auth` field of every request envelope.
    api_key: Option<String>,
    /// Retry configuration.
    retry_config: RetryConfig,
    /// Diagnostics for the most recent exchange.
    last_exchange: Arc<RwLock<Option<LastExchange>>>,
}

impl PushwooshClient {
    /// Create a new client from configuration.
    pub fn new(config: &ClientConfig) -> PwResult<Self> {
        let inner = Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms))
            .connect_timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| PwError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            api_endpoint: pw_core::config::sanitize_endpoint(&config.api_endpoint),
            api_key: config.api_key.clone(),
            retry_config: RetryConfig::default(),
            last_exchange: Arc::new(RwLock::new(None)),
        })
    }

    /// Set custom retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// The configured base endpoint.
    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Diagnostics for the most recent request/response exchange.
    pub async fn last_exchange(&self) -> Option<LastExchange> {
        self.last_exchange.read().await.clone()
    }

    /// Wrap an endpoint body in the service envelope, injecting the `auth`
    /// credential exactly once when one is configured.
    fn envelope(&self, request: Value) -> PwResult<Value> {
        let mut request = request;
        let fields = request
            .as_object_mut()
            .ok_or_else(|| PwError::Serialization("request body must be a JSON object".into()))?;

        if let Some(key) = &self.api_key {
            fields.insert("auth".to_string(), Value::String(key.clone()));
        }

        Ok(serde_json::json!({ "request": request }))
    }

    /// Perform one logical API call: wrap the body in the request envelope,
    /// POST it, and return the decoded response object.
    ///
    /// The whole decoded envelope is returned; business errors reported
    /// inside a successful HTTP response (embedded `status_code` != 200) are
    /// left for the caller to interpret.
    pub async fn send(&self, uri: &str, request: Value) -> PwResult<Value> {
        if uri.is_empty() {
            return Err(PwError::MissingParameter("uri must not be empty".into()));
        }

        let wrapped = self.envelope(request)?;
        let body_text = serde_json::to_string(&wrapped)?;
        let url = format!("{}/{}", self.api_endpoint, uri);

        debug!("POST {url}");
        debug!("request body: {body_text}");

        let mut last_error: Option<PwError> = None;

        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay(attempt - 1);
                warn!(
                    "retrying POST {uri} (attempt {}/{}) after {:.1}s",
                    attempt + 1,
                    self.retry_config.max_retries + 1,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.inner.post(&url).json(&wrapped).send().await {
                Ok(response) => response,
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    let err = classify_error(e);

                    if transient && attempt < self.retry_config.max_retries {
                        warn!("transient error on {uri}: {err}");
                        last_error = Some(err);
                        continue;
                    }

                    self.record_exchange(&url, &body_text, None, None, None).await;
                    return Err(err);
                }
            };

            let status = response.status();
            debug!("response status: {status}");

            if constants::OK_STATUSES.contains(&status.as_u16()) {
                return self.decode_body(&url, &body_text, status, response).await;
            }

            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            let text = response.text().await.unwrap_or_default();

            if self.is_retryable_status(status) && attempt < self.retry_config.max_retries {
                warn!("retryable status {} from {uri}", status.as_u16());
                last_error = Some(PwError::HttpStatus {
                    status: status.as_u16(),
                    reason,
                    body: text,
                });
                continue;
            }

            error!("api returned {} for {uri}: {reason}", status.as_u16());
            self.record_exchange(&url, &body_text, Some(status.as_u16()), Some(text.clone()), None)
                .await;
            return Err(PwError::HttpStatus {
                status: status.as_u16(),
                reason,
                body: text,
            });
        }

        Err(last_error.unwrap_or_else(|| PwError::Http("max retries exceeded".into())))
    }

    /// Decode a success-status response body, classifying empty or null JSON
    /// as an error. Never retried: the server accepted the request.
    async fn decode_body(
        &self,
        url: &str,
        body_text: &str,
        status: StatusCode,
        response: reqwest::Response,
    ) -> PwResult<Value> {
        let text = response
            .text()
            .await
            .map_err(|e| PwError::Http(format!("failed to read response body: {e}")))?;

        match serde_json::from_str::<Value>(&text) {
            Ok(json) if !json.is_null() => {
                debug!("response json: {json}");
                self.record_exchange(
                    url,
                    body_text,
                    Some(status.as_u16()),
                    Some(text),
                    Some(json.clone()),
                )
                .await;
                Ok(json)
            }
            _ => {
                warn!("no JSON in response from API, text: {text}");
                self.record_exchange(url, body_text, Some(status.as_u16()), Some(text.clone()), None)
                    .await;
                Err(PwError::EmptyResponse {
                    message: format!("no JSON in response, text: {text}"),
                    body: text,
                })
            }
        }
    }

    fn is_retryable_status(&self, status: StatusCode) -> bool {
        self.retry_config.retryable_statuses.contains(&status.as_u16())
    }

    /// Exponential backoff with proportional jitter.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let base = self.base_retry_delay(attempt);
        let jitter_ms = base.as_millis() as u64 / 4;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }

    /// The un-jittered backoff curve: base * 2^attempt, capped at max_delay.
    fn base_retry_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.retry_config.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << attempt.min(16));
        let max_ms = self.retry_config.max_delay.as_millis() as u64;
        Duration::from_millis(delay_ms.min(max_ms))
    }

    async fn record_exchange(
        &self,
        url: &str,
        request_body: &str,
        status: Option<u16>,
        response_text: Option<String>,
        response_json: Option<Value>,
    ) {
        let mut guard = self.last_exchange.write().await;
        *guard = Some(LastExchange {
            url: url.to_string(),
            request_body: request_body.to_string(),
            status,
            response_text,
            response_json,
        });
    }
}

/// Classify a reqwest error into a PwError variant.
fn classify_error(e: reqwest::Error) -> PwError {
    if e.is_timeout() {
        PwError::Timeout(e.to_string())
    } else if e.is_connect() {
        PwError::Http(format!("connection failed: {e}"))
    } else {
        PwError::Http(e.to_string())
    }
}
