//! Asynchronous job result endpoints.
//!
//! Several calls (segment export, bulk tag setting, bulk registration)
//! schedule a remote job and return a request ID. `get_results` is the
//! single-shot status check; `wait_for_result` polls it until the job
//! finishes.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use pw_core::constants;
use pw_core::error::{PwError, PwResult};

use crate::client::PushwooshClient;
use crate::response::ApiResponse;

/// Polling behaviour for [`PushwooshClient::wait_for_result`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed interval between status checks.
    pub interval: Duration,
    /// Give up after this many checks. `None` polls until the job
    /// completes, which can block forever on a job that never finishes.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(constants::DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: None,
        }
    }
}

impl PollConfig {
    /// Poll every `interval`, at most `max_attempts` times.
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
        }
    }
}

impl PushwooshClient {
    /// Fetch the current result of a scheduled job. Returns the whole
    /// envelope; an embedded status code other than 200 means the job has
    /// not completed yet.
    pub async fn get_results(&self, request_id: &str) -> PwResult<Value> {
        let body = serde_json::json!({ "request_id": request_id });
        self.send("getResults", body).await
    }

    /// Block until a scheduled job completes, polling `get_results` at a
    /// fixed interval.
    ///
    /// A response whose status code is missing or not an integer is treated
    /// as "indeterminate, keep polling" and logged, since the job-status
    /// endpoint is known to emit transient malformed responses. When
    /// `config.max_attempts` is set and exhausted, returns
    /// [`PwError::PollTimeout`].
    pub async fn wait_for_result(&self, request_id: &str, config: &PollConfig) -> PwResult<Value> {
        let mut attempts: u32 = 0;

        loop {
            let result = self.get_results(request_id).await?;
            let envelope = ApiResponse::from_value(&result);

            match envelope.status_code {
                Some(code) if code == constants::JOB_DONE_STATUS => return Ok(result),
                Some(code) => {
                    info!(
                        "request {request_id} is not ready yet, status {code}, \
                         retrying in {}s",
                        config.interval.as_secs()
                    );
                }
                None => {
                    // Indistinguishable from a permanently broken job; made
                    // observable so operators can tell the two apart.
                    warn!("request {request_id} returned no readable status code, still polling");
                }
            }

            attempts += 1;
            if let Some(max) = config.max_attempts {
                if attempts >= max {
                    return Err(PwError::PollTimeout {
                        request_id: request_id.to_string(),
                        attempts,
                    });
                }
            }

            tokio::time::sleep(config.interval).await;
        }
    }
}
