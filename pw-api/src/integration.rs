//! Client for the Integrations API.
//!
//! The Integrations API differs from the primary JSON API in two ways: the
//! credential travels in an `Authorization` header instead of the request
//! envelope, and bodies are sent flat, without the `{"request": ...}`
//! wrapper. The credential is owned per instance; clients never share
//! header state.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use pw_core::config::IntegrationConfig;
use pw_core::error::{PwError, PwResult};

use crate::client::{LastExchange, RetryConfig};

/// Client for the Pushwoosh Integrations API.
#[derive(Clone)]
pub struct IntegrationClient {
    inner: Client,
    /// Base endpoint URL (no trailing slash).
    api_endpoint: String,
    /// Credential sent as the `Authorization` header value.
    api_key: String,
    /// Retry configuration.
    retry_config: RetryConfig,
    /// Diagnostics for the most recent exchange.
    last_exchange: Arc<RwLock<Option<LastExchange>>>,
}

impl IntegrationClient {
    /// Create a new client from configuration.
    pub fn new(config: &IntegrationConfig) -> PwResult<Self> {
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

    /// POST `body` verbatim to the given relative URI and return the decoded
    /// JSON response. Any 2xx status is a success.
    pub async fn call(&self, uri: &str, body: &Value) -> PwResult<Value> {
        if uri.is_empty() {
            return Err(PwError::MissingParameter("uri must not be empty".into()));
        }

        let body_text = serde_json::to_string(body)?;
        let url = format!("{}/{}", self.api_endpoint, uri);

        debug!("POST {url}");
        debug!("request body: {body_text}");

        let mut last_error: Option<PwError> = None;

        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(&self.retry_config, attempt - 1);
                warn!(
                    "retrying POST {uri} (attempt {}/{})",
                    attempt + 1,
                    self.retry_config.max_retries + 1
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .inner
                .post(&url)
                .header("Authorization", &self.api_key)
                .json(body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    let err = if e.is_timeout() {
                        PwError::Timeout(e.to_string())
                    } else {
                        PwError::Http(e.to_string())
                    };

                    if transient && attempt < self.retry_config.max_retries {
                        warn!("transient error on {uri}: {err}");
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            };

            let status = response.status();
            debug!("response status: {status}");

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| PwError::Http(format!("failed to read response body: {e}")))?;

                return match serde_json::from_str::<Value>(&text) {
                    Ok(json) if !json.is_null() => {
                        self.record_exchange(&url, &body_text, status.as_u16(), &text, Some(&json))
                            .await;
                        Ok(json)
                    }
                    _ => {
                        self.record_exchange(&url, &body_text, status.as_u16(), &text, None)
                            .await;
                        Err(PwError::EmptyResponse {
                            message: format!("no JSON in response, text: {text}"),
                            body: text,
                        })
                    }
                };
            }

            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            let text = response.text().await.unwrap_or_default();

            if self.retry_config.retryable_statuses.contains(&status.as_u16())
                && attempt < self.retry_config.max_retries
            {
                warn!("retryable status {} from {uri}", status.as_u16());
                last_error = Some(PwError::HttpStatus {
                    status: status.as_u16(),
                    reason,
                    body: text,
                });
                continue;
            }

            error!("integrations api returned {} for {uri}: {reason}", status.as_u16());
            self.record_exchange(&url, &body_text, status.as_u16(), &text, None).await;
            return Err(PwError::HttpStatus {
                status: status.as_u16(),
                reason,
                body: text,
            });
        }

        Err(last_error.unwrap_or_else(|| PwError::Http("max retries exceeded".into())))
    }

    /// The generic "touch" call.
    pub async fn touch(&self, body: &Value) -> PwResult<Value> {
        self.call("touch", body).await
    }

    async fn record_exchange(
        &self,
        url: &str,
        request_body: &str,
        status: u16,
        response_text: &str,
        response_json: Option<&Value>,
    ) {
        let mut guard = self.last_exchange.write().await;
        *guard = Some(LastExchange {
            url: url.to_string(),
            request_body: request_body.to_string(),
            status: Some(status),
            response_text: Some(response_text.to_string()),
            response_json: response_json.cloned(),
        });
    }
}

fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base_ms = config.base_delay.as_millis() as u64;
    let delay_ms = base_ms.saturating_mul(1u64 << attempt.min(16));
    let max_ms = config.max_delay.as_millis() as u64;
    Duration::from_millis(delay_ms.min(max_ms))
}
