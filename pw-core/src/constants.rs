//! Client-wide constants.

/// Default base endpoint for the primary JSON API.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.pushwoosh.com/json/1.3";

/// Default base endpoint for the Integrations API.
pub const DEFAULT_INTEGRATION_ENDPOINT: &str = "https://integrations.pushwoosh.com/api/v1";

/// HTTP status codes the primary API treats as success.
pub const OK_STATUSES: &[u16] = &[200, 210];

/// Default request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Default interval between job-status polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Status code inside the response envelope that marks a finished job.
pub const JOB_DONE_STATUS: i64 = 200;
